//! Typed chain links.
//!
//! A [`ChainLink`] is one endpoint of an inference: a digit placed on a
//! [`ChainNode`], flagged strong or weak, and optionally marked as the start
//! of a branch in a forcing net. Node shapes are an explicit enum, so
//! callers never deal with slot reuse or sign tricks; those live only in
//! [`PackedLink`](crate::PackedLink).

use std::fmt::{self, Display};

use deduce_core::{Candidate, CellMask, CellSet, house};

use crate::{AlmostBuddies, PackedLink};

/// The kind tag of a chain node, as stored in the packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
#[repr(u8)]
pub enum NodeKind {
    /// A single cell.
    Normal = 0,
    /// Two or three cells sharing a house.
    Group = 1,
    /// An Almost Locked Set.
    Als = 2,
    /// An Almost Hidden Set.
    Ahs = 3,
    /// An Almost Unique Rectangle.
    Aur = 4,
    /// A nested sub-chain.
    Chain = 5,
}

impl NodeKind {
    /// All node kinds in tag order.
    pub const ALL: [Self; 6] = [
        Self::Normal,
        Self::Group,
        Self::Als,
        Self::Ahs,
        Self::Aur,
        Self::Chain,
    ];

    /// Returns the 3-bit tag of this kind.
    #[must_use]
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the kind with tag `tag`, if any.
    #[must_use]
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Normal),
            1 => Some(Self::Group),
            2 => Some(Self::Als),
            3 => Some(Self::Ahs),
            4 => Some(Self::Aur),
            5 => Some(Self::Chain),
            _ => None,
        }
    }

    /// Returns `true` for kinds that reference an almost-structure array.
    #[must_use]
    #[inline]
    pub const fn is_almost(self) -> bool {
        matches!(self, Self::Als | Self::Ahs | Self::Aur)
    }
}

/// The almost-structure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum AlmostKind {
    /// An Almost Locked Set: N cells holding N+1 digits.
    Als,
    /// An Almost Hidden Set.
    Ahs,
    /// An Almost Unique Rectangle.
    Aur,
}

impl From<AlmostKind> for NodeKind {
    fn from(kind: AlmostKind) -> Self {
        match kind {
            AlmostKind::Als => Self::Als,
            AlmostKind::Ahs => Self::Ahs,
            AlmostKind::Aur => Self::Aur,
        }
    }
}

impl AlmostKind {
    /// Returns the almost kind for `kind`, if it is one.
    #[must_use]
    pub const fn from_node_kind(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Als => Some(Self::Als),
            NodeKind::Ahs => Some(Self::Ahs),
            NodeKind::Aur => Some(Self::Aur),
            _ => None,
        }
    }
}

/// The two or three cells of a group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupCells {
    cells: [u8; 3],
    len: u8,
}

impl GroupCells {
    /// Creates a group of two cells.
    #[must_use]
    pub const fn pair(first: u8, second: u8) -> Self {
        Self {
            cells: [first, second, 0],
            len: 2,
        }
    }

    /// Creates a group of three cells.
    #[must_use]
    pub const fn triple(first: u8, second: u8, third: u8) -> Self {
        Self {
            cells: [first, second, third],
            len: 3,
        }
    }

    /// Creates a group from two cells and an optional third.
    #[must_use]
    pub const fn new(first: u8, second: u8, third: Option<u8>) -> Self {
        match third {
            Some(third) => Self::triple(first, second, third),
            None => Self::pair(first, second),
        }
    }

    /// Returns the cells in the order they were given.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells[..usize::from(self.len)]
    }

    /// Returns the third cell, if the group has one.
    #[must_use]
    pub const fn third(&self) -> Option<u8> {
        if self.len == 3 { Some(self.cells[2]) } else { None }
    }

    /// Returns the cells as a mask.
    #[must_use]
    pub fn mask(&self) -> CellMask {
        self.as_slice().iter().copied().collect()
    }
}

/// The node a link's digit sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum ChainNode {
    /// A single cell.
    Normal {
        /// Cell index (0-80).
        cell: u8,
    },
    /// Two or three cells in one house acting as one unit.
    Group {
        /// The grouped cells; the first is the primary cell.
        cells: GroupCells,
    },
    /// An entry into an almost-structure held in a side array.
    Almost {
        /// Which kind of almost-structure.
        kind: AlmostKind,
        /// Primary cell index (0-80).
        cell: u8,
        /// Position in the step's almost-structure array (14 bits).
        index: u16,
    },
    /// A nested sub-chain anchored at a cell.
    SubChain {
        /// Cell index (0-80).
        cell: u8,
    },
}

impl ChainNode {
    /// Returns the kind tag of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Normal { .. } => NodeKind::Normal,
            Self::Group { .. } => NodeKind::Group,
            Self::Almost { kind, .. } => match kind {
                AlmostKind::Als => NodeKind::Als,
                AlmostKind::Ahs => NodeKind::Ahs,
                AlmostKind::Aur => NodeKind::Aur,
            },
            Self::SubChain { .. } => NodeKind::Chain,
        }
    }

    /// Returns the primary cell of this node.
    #[must_use]
    pub const fn cell(&self) -> u8 {
        match self {
            Self::Normal { cell } | Self::Almost { cell, .. } | Self::SubChain { cell } => *cell,
            Self::Group { cells } => cells.cells[0],
        }
    }

    /// Returns the almost-structure index, if this node references one.
    #[must_use]
    pub const fn almost_index(&self) -> Option<u16> {
        match self {
            Self::Almost { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// One link of a chain: a digit on a node with its inference flags.
///
/// # Examples
///
/// ```
/// use deduce_chain::{ChainLink, NodeKind};
///
/// let link = ChainLink::normal(10, 4, true);
/// assert_eq!(link.cell(), 10);
/// assert_eq!(link.kind(), NodeKind::Normal);
/// assert!(link.is_strong());
/// assert!(!link.is_branch());
///
/// let packed = link.pack();
/// assert_eq!(packed.unpack(), Ok(link));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainLink {
    node: ChainNode,
    digit: u8,
    strong: bool,
    branch: bool,
}

impl ChainLink {
    /// Creates a link on an arbitrary node.
    #[must_use]
    pub const fn new(node: ChainNode, digit: u8, strong: bool) -> Self {
        Self {
            node,
            digit,
            strong,
            branch: false,
        }
    }

    /// Creates a link on a single cell.
    #[must_use]
    pub const fn normal(cell: u8, digit: u8, strong: bool) -> Self {
        Self::new(ChainNode::Normal { cell }, digit, strong)
    }

    /// Creates a link on a group of cells.
    #[must_use]
    pub const fn group(cells: GroupCells, digit: u8, strong: bool) -> Self {
        Self::new(ChainNode::Group { cells }, digit, strong)
    }

    /// Creates a link into an almost-structure at `index` of the side array.
    #[must_use]
    pub const fn almost(kind: AlmostKind, cell: u8, index: u16, digit: u8, strong: bool) -> Self {
        Self::new(ChainNode::Almost { kind, cell, index }, digit, strong)
    }

    /// Creates a link on a nested sub-chain.
    #[must_use]
    pub const fn sub_chain(cell: u8, digit: u8, strong: bool) -> Self {
        Self::new(ChainNode::SubChain { cell }, digit, strong)
    }

    /// Returns this link marked as the start of a forcing-net branch.
    #[must_use]
    pub const fn into_branch(mut self) -> Self {
        self.branch = true;
        self
    }

    /// Sets or clears the branch marker.
    pub const fn set_branch(&mut self, branch: bool) {
        self.branch = branch;
    }

    /// Returns the node.
    #[must_use]
    pub const fn node(&self) -> &ChainNode {
        &self.node
    }

    /// Returns the digit (1-9).
    #[must_use]
    pub const fn digit(&self) -> u8 {
        self.digit
    }

    /// Returns `true` for a strong link, `false` for a weak one.
    #[must_use]
    pub const fn is_strong(&self) -> bool {
        self.strong
    }

    /// Returns `true` if this link starts a branch in a forcing net.
    #[must_use]
    pub const fn is_branch(&self) -> bool {
        self.branch
    }

    /// Returns the kind tag of the node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// Returns the primary cell of the node.
    #[must_use]
    pub const fn cell(&self) -> u8 {
        self.node.cell()
    }

    /// Returns the almost-structure index, if the node references one.
    #[must_use]
    pub const fn almost_index(&self) -> Option<u16> {
        self.node.almost_index()
    }

    /// Points the node at a different almost-structure index.
    ///
    /// Does nothing for nodes without an almost-structure reference.
    pub const fn set_almost_index(&mut self, new_index: u16) {
        if let ChainNode::Almost { index, .. } = &mut self.node {
            *index = new_index;
        }
    }

    /// Returns the primary cell and digit as a [`Candidate`].
    #[must_use]
    pub const fn candidate(&self) -> Candidate {
        Candidate::new(self.cell(), self.digit)
    }

    /// Encodes this link into its packed word form.
    #[must_use]
    pub fn pack(&self) -> PackedLink {
        PackedLink::from(*self)
    }

    /// Returns the cells that see every cell of this node for `digit`.
    ///
    /// * normal nodes: the peers of the cell;
    /// * group nodes: the intersection of the peers of all grouped cells;
    /// * almost nodes: the per-digit buddy set precomputed on the referenced
    ///   structure in `almost_structures`.
    ///
    /// Sub-chain nodes, and almost nodes whose reference cannot be resolved,
    /// are logged as errors and yield an empty set so that one malformed
    /// link does not abort a whole search pass.
    pub fn buddies<A>(&self, digit: u8, almost_structures: &[A]) -> CellSet
    where
        A: AlmostBuddies,
    {
        match &self.node {
            ChainNode::Normal { cell } => CellSet::buddies(*cell),
            ChainNode::Group { cells } => CellSet::from(
                cells
                    .as_slice()
                    .iter()
                    .fold(CellMask::FULL, |acc, &cell| acc & house::peers(cell)),
            ),
            ChainNode::Almost { kind, index, .. } => {
                let Some(structure) = almost_structures.get(usize::from(*index)) else {
                    log::error!(
                        "{kind:?} node references almost-structure {index}, but only {} are available",
                        almost_structures.len()
                    );
                    return CellSet::new();
                };
                if let Some(buddies) = structure.buddies_for(digit) {
                    CellSet::from(buddies)
                } else {
                    log::error!("almost-structure {index} has no buddy set for digit {digit}");
                    CellSet::new()
                }
            }
            ChainNode::SubChain { .. } => {
                log::error!("cannot compute buddies of a sub-chain node: {self}");
                CellSet::new()
            }
        }
    }
}

impl Display for ChainLink {
    /// Renders the link as e.g. `r1c1(5)=`, `r1c1|r1c2(5)-`, `ALS#3@r4c4(2)=`;
    /// `=` marks a strong link, `-` a weak one, and a leading `*` a branch start.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_cell(f: &mut fmt::Formatter<'_>, cell: u8) -> fmt::Result {
            write!(f, "r{}c{}", house::row_of(cell) + 1, house::column_of(cell) + 1)
        }

        if self.branch {
            f.write_str("*")?;
        }
        match &self.node {
            ChainNode::Normal { cell } => write_cell(f, *cell)?,
            ChainNode::Group { cells } => {
                for (i, &cell) in cells.as_slice().iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write_cell(f, cell)?;
                }
            }
            ChainNode::Almost { kind, cell, index } => {
                let name = match kind {
                    AlmostKind::Als => "ALS",
                    AlmostKind::Ahs => "AHS",
                    AlmostKind::Aur => "AUR",
                };
                write!(f, "{name}#{index}@")?;
                write_cell(f, *cell)?;
            }
            ChainNode::SubChain { cell } => {
                f.write_str("CHAIN@")?;
                write_cell(f, *cell)?;
            }
        }
        write!(
            f,
            "({}){}",
            self.digit,
            if self.strong { "=" } else { "-" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        buddies: [Option<CellMask>; 10],
    }

    impl crate::AlmostStructure for Fixture {
        fn cell_count(&self) -> usize {
            2
        }
    }

    impl AlmostBuddies for Fixture {
        fn buddies_for(&self, digit: u8) -> Option<CellMask> {
            self.buddies[usize::from(digit)]
        }
    }

    fn no_structures() -> &'static [Fixture] {
        &[]
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(NodeKind::from_tag(6), None);
        assert_eq!(NodeKind::from_tag(7), None);
        assert!(NodeKind::Aur.is_almost());
        assert!(!NodeKind::Chain.is_almost());
    }

    #[test]
    fn test_group_cells() {
        let pair = GroupCells::pair(0, 1);
        assert_eq!(pair.as_slice(), &[0, 1]);
        assert_eq!(pair.third(), None);
        let triple = GroupCells::new(0, 1, Some(2));
        assert_eq!(triple.as_slice(), &[0, 1, 2]);
        assert_eq!(triple.mask(), CellMask::from_iter([0, 1, 2]));
    }

    #[test]
    fn test_normal_buddies_are_peers() {
        let link = ChainLink::normal(40, 5, false);
        assert_eq!(link.buddies(5, no_structures()), CellSet::buddies(40));
    }

    #[test]
    fn test_group_buddies_intersect_peers() {
        // r1c1, r1c2, r1c3: the rest of row 1 and box 1
        let link = ChainLink::group(GroupCells::triple(0, 1, 2), 3, true);
        let buddies = link.buddies(3, no_structures());
        assert_eq!(
            buddies.members(),
            &[3, 4, 5, 6, 7, 8, 9, 10, 11, 18, 19, 20]
        );
    }

    #[test]
    fn test_almost_buddies_come_from_side_array() {
        let mut buddies = [None; 10];
        buddies[7] = Some(CellMask::from_iter([60, 61]));
        let structures = [Fixture { buddies: [None; 10] }, Fixture { buddies }];

        let link = ChainLink::almost(AlmostKind::Als, 12, 1, 7, true);
        assert_eq!(link.buddies(7, &structures).members(), &[60, 61]);
        assert!(link.buddies(6, &structures).is_empty());

        let dangling = ChainLink::almost(AlmostKind::Ahs, 12, 5, 7, true);
        assert!(dangling.buddies(7, &structures).is_empty());
    }

    #[test]
    fn test_sub_chain_buddies_are_empty() {
        let link = ChainLink::sub_chain(0, 1, true);
        assert!(link.buddies(1, no_structures()).is_empty());
    }

    #[test]
    fn test_almost_index_rewrite() {
        let mut link = ChainLink::almost(AlmostKind::Aur, 3, 900, 2, false);
        link.set_almost_index(4);
        assert_eq!(link.almost_index(), Some(4));

        let mut normal = ChainLink::normal(3, 2, false);
        normal.set_almost_index(4);
        assert_eq!(normal.almost_index(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChainLink::normal(0, 5, true).to_string(), "r1c1(5)=");
        assert_eq!(
            ChainLink::group(GroupCells::pair(0, 1), 5, false).to_string(),
            "r1c1|r1c2(5)-"
        );
        assert_eq!(
            ChainLink::almost(AlmostKind::Als, 40, 3, 2, true)
                .into_branch()
                .to_string(),
            "*ALS#3@r5c5(2)="
        );
        assert_eq!(ChainLink::sub_chain(80, 9, false).to_string(), "CHAIN@r9c9(9)-");
    }

    #[test]
    fn test_candidate() {
        let link = ChainLink::group(GroupCells::pair(30, 31), 6, true);
        assert_eq!(link.candidate(), Candidate::new(30, 6));
    }
}
