//! The packed 32-bit link word.
//!
//! [`PackedLink`] is the legacy serialized form of a [`ChainLink`]: a single
//! signed 32-bit word whose fields are reused differently per node kind.
//!
//! | bits  | field |
//! |-------|-------|
//! | 0-3   | digit |
//! | 4     | strong flag |
//! | 5-11  | primary cell index |
//! | 12-18 | second slot: group cell 2, or almost index bits 7-13 |
//! | 19-25 | third slot: group cell 3, or almost index bits 0-6 |
//! | 26-28 | node kind tag |
//! | sign  | branch marker (the whole word is negated) |
//!
//! Unused slots hold `0` for normal nodes and [`NO_INDEX`] for every other
//! kind. Every accessor reads the absolute value of the word, so the branch
//! marker never leaks into field decoding.
//!
//! Encoding does not range-check its inputs: out-of-range values are
//! silently truncated by masking. Callers must pass cell indices 0-80 and
//! digits 1-9.
//!
//! # Examples
//!
//! ```
//! use deduce_chain::{NodeKind, PackedLink};
//!
//! let link = PackedLink::encode_group(0, 1, None, 7, false);
//! assert_eq!(link.kind(), Ok(NodeKind::Group));
//! assert_eq!((link.cell(), link.index2(), link.index3()), (0, Some(1), None));
//!
//! let branch = link.as_branch();
//! assert!(branch.word() < 0);
//! assert_eq!(branch.digit(), 7);
//! assert_eq!(branch.index2(), Some(1));
//! ```

use std::fmt::{self, Display};

use deduce_core::CellSet;

use crate::{AlmostBuddies, AlmostKind, ChainLink, ChainNode, DecodeError, GroupCells, NodeKind};

/// Sentinel stored in an unused second/third slot of a non-normal node.
pub const NO_INDEX: u8 = 0x7f;

/// Largest almost-structure index a link can hold (14 bits).
pub const MAX_ALMOST_INDEX: u16 = 0x3fff;

const DIGIT_MASK: u32 = 0xf;
const STRONG_BIT: u32 = 1 << 4;
const INDEX_MASK: u32 = 0x7f;
const INDEX1_SHIFT: u32 = 5;
const INDEX2_SHIFT: u32 = 12;
const INDEX3_SHIFT: u32 = 19;
const KIND_MASK: u32 = 0x7;
const KIND_SHIFT: u32 = 26;

/// Splits an almost-structure index into its high and low 7-bit halves.
///
/// Bits above 13 are dropped.
#[must_use]
#[inline]
pub const fn split_almost_index(index: u16) -> (u8, u8) {
    (((index >> 7) & 0x7f) as u8, (index & 0x7f) as u8)
}

/// Joins high and low 7-bit halves back into an almost-structure index.
#[must_use]
#[inline]
pub const fn join_almost_index(high: u8, low: u8) -> u16 {
    ((high as u16 & 0x7f) << 7) | (low as u16 & 0x7f)
}

/// A chain link packed into one signed 32-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PackedLink(i32);

impl PackedLink {
    /// Wraps a raw word.
    #[must_use]
    #[inline]
    pub const fn from_word(word: i32) -> Self {
        Self(word)
    }

    /// Returns the raw word, including the branch sign.
    #[must_use]
    #[inline]
    pub const fn word(self) -> i32 {
        self.0
    }

    /// Encodes a link from raw slots.
    ///
    /// `None` in `index2`/`index3` is stored as `0` for a normal node and as
    /// [`NO_INDEX`] for every other kind. For almost-structure kinds the two
    /// slots carry the halves of the side-array index; see
    /// [`encode_almost`](Self::encode_almost).
    #[must_use]
    pub const fn encode(
        index1: u8,
        index2: Option<u8>,
        index3: Option<u8>,
        digit: u8,
        strong: bool,
        kind: NodeKind,
    ) -> Self {
        let unused = if matches!(kind, NodeKind::Normal) {
            0
        } else {
            NO_INDEX
        };
        let index2 = match index2 {
            Some(index) => index,
            None => unused,
        };
        let index3 = match index3 {
            Some(index) => index,
            None => unused,
        };
        let mut word = (digit as u32) & DIGIT_MASK;
        if strong {
            word |= STRONG_BIT;
        }
        word |= ((index1 as u32) & INDEX_MASK) << INDEX1_SHIFT;
        word |= ((index2 as u32) & INDEX_MASK) << INDEX2_SHIFT;
        word |= ((index3 as u32) & INDEX_MASK) << INDEX3_SHIFT;
        word |= ((kind.tag() as u32) & KIND_MASK) << KIND_SHIFT;
        Self(word.cast_signed())
    }

    /// Encodes a link on a single cell.
    #[must_use]
    #[inline]
    pub const fn encode_normal(cell: u8, digit: u8, strong: bool) -> Self {
        Self::encode(cell, None, None, digit, strong, NodeKind::Normal)
    }

    /// Encodes a link on two or three grouped cells.
    #[must_use]
    #[inline]
    pub const fn encode_group(
        first: u8,
        second: u8,
        third: Option<u8>,
        digit: u8,
        strong: bool,
    ) -> Self {
        Self::encode(first, Some(second), third, digit, strong, NodeKind::Group)
    }

    /// Encodes a link into an almost-structure.
    ///
    /// `index` (at most [`MAX_ALMOST_INDEX`]) is split into two 7-bit halves
    /// stored in the slots a group node uses for its second and third cells.
    #[must_use]
    #[inline]
    pub const fn encode_almost(
        kind: AlmostKind,
        cell: u8,
        index: u16,
        digit: u8,
        strong: bool,
    ) -> Self {
        let (high, low) = split_almost_index(index);
        let kind = match kind {
            AlmostKind::Als => NodeKind::Als,
            AlmostKind::Ahs => NodeKind::Ahs,
            AlmostKind::Aur => NodeKind::Aur,
        };
        Self::encode(cell, Some(high), Some(low), digit, strong, kind)
    }

    #[inline]
    const fn bits(self) -> u32 {
        self.0.unsigned_abs()
    }

    #[inline]
    const fn slot(self, shift: u32) -> u8 {
        ((self.bits() >> shift) & INDEX_MASK) as u8
    }

    #[inline]
    const fn kind_tag(self) -> u8 {
        ((self.bits() >> KIND_SHIFT) & KIND_MASK) as u8
    }

    /// Returns the digit.
    #[must_use]
    #[inline]
    pub const fn digit(self) -> u8 {
        (self.bits() & DIGIT_MASK) as u8
    }

    /// Returns `true` for a strong link.
    #[must_use]
    #[inline]
    pub const fn is_strong(self) -> bool {
        self.bits() & STRONG_BIT != 0
    }

    /// Returns the primary cell index.
    #[must_use]
    #[inline]
    pub const fn cell(self) -> u8 {
        self.slot(INDEX1_SHIFT)
    }

    /// Returns the second slot, or `None` if it is unused.
    ///
    /// For group nodes this is the second cell; for almost-structure nodes it
    /// is the high half of the side-array index.
    #[must_use]
    #[inline]
    pub const fn index2(self) -> Option<u8> {
        self.optional_slot(INDEX2_SHIFT)
    }

    /// Returns the third slot, or `None` if it is unused.
    ///
    /// For group nodes this is the third cell; for almost-structure nodes it
    /// is the low half of the side-array index.
    #[must_use]
    #[inline]
    pub const fn index3(self) -> Option<u8> {
        self.optional_slot(INDEX3_SHIFT)
    }

    const fn optional_slot(self, shift: u32) -> Option<u8> {
        if self.kind_tag() == NodeKind::Normal.tag() {
            return None;
        }
        match self.slot(shift) {
            NO_INDEX => None,
            index => Some(index),
        }
    }

    /// Returns the node kind.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownKind`] if the kind bits hold 6 or 7.
    #[inline]
    pub const fn kind(self) -> Result<NodeKind, DecodeError> {
        let kind = self.kind_tag();
        match NodeKind::from_tag(kind) {
            Some(kind) => Ok(kind),
            None => Err(DecodeError::UnknownKind { word: self.0, kind }),
        }
    }

    /// Returns the 14-bit almost-structure index held in the second and third slots.
    ///
    /// The result is only meaningful for almost-structure kinds.
    #[must_use]
    #[inline]
    pub const fn almost_index(self) -> u16 {
        join_almost_index(self.slot(INDEX2_SHIFT), self.slot(INDEX3_SHIFT))
    }

    /// Returns a copy pointing at a different almost-structure index.
    ///
    /// The branch marker is preserved.
    #[must_use]
    pub const fn with_almost_index(self, index: u16) -> Self {
        let (high, low) = split_almost_index(index);
        let mut bits = self.bits();
        bits &= !((INDEX_MASK << INDEX2_SHIFT) | (INDEX_MASK << INDEX3_SHIFT));
        bits |= (high as u32) << INDEX2_SHIFT;
        bits |= (low as u32) << INDEX3_SHIFT;
        let word = bits.cast_signed();
        if self.is_branch() {
            Self(-word)
        } else {
            Self(word)
        }
    }

    /// Returns `true` if this link starts a branch in a forcing net.
    #[must_use]
    #[inline]
    pub const fn is_branch(self) -> bool {
        self.0 < 0
    }

    /// Returns this link with the branch marker set.
    #[must_use]
    #[inline]
    pub const fn as_branch(self) -> Self {
        if self.is_branch() { self } else { Self(-self.0) }
    }

    /// Returns this link with the branch marker cleared.
    #[must_use]
    #[inline]
    pub const fn without_branch(self) -> Self {
        if self.is_branch() { Self(-self.0) } else { self }
    }

    /// Decodes the word into a typed [`ChainLink`].
    ///
    /// # Errors
    ///
    /// Returns an error if the kind bits are not a known [`NodeKind`], a
    /// group node lacks its second cell, a cell slot holds an index past 80,
    /// or the digit is outside 1-9.
    pub fn unpack(self) -> Result<ChainLink, DecodeError> {
        let kind = self.kind()?;
        let digit = self.digit();
        if !(1..=9).contains(&digit) {
            return Err(DecodeError::DigitOutOfRange {
                word: self.0,
                digit,
            });
        }
        let cell = self.checked_cell(self.cell())?;
        let node = match kind {
            NodeKind::Normal => ChainNode::Normal { cell },
            NodeKind::Group => {
                let second = self
                    .index2()
                    .ok_or(DecodeError::IncompleteGroup { word: self.0 })?;
                let third = self
                    .index3()
                    .map(|third| self.checked_cell(third))
                    .transpose()?;
                ChainNode::Group {
                    cells: GroupCells::new(cell, self.checked_cell(second)?, third),
                }
            }
            NodeKind::Als => self.almost_node(AlmostKind::Als, cell),
            NodeKind::Ahs => self.almost_node(AlmostKind::Ahs, cell),
            NodeKind::Aur => self.almost_node(AlmostKind::Aur, cell),
            NodeKind::Chain => ChainNode::SubChain { cell },
        };
        let mut link = ChainLink::new(node, digit, self.is_strong());
        link.set_branch(self.is_branch());
        Ok(link)
    }

    fn checked_cell(self, cell: u8) -> Result<u8, DecodeError> {
        if cell < 81 {
            Ok(cell)
        } else {
            Err(DecodeError::CellOutOfRange { word: self.0, cell })
        }
    }

    fn almost_node(self, kind: AlmostKind, cell: u8) -> ChainNode {
        ChainNode::Almost {
            kind,
            cell,
            index: self.almost_index(),
        }
    }

    /// Returns the cells that see every cell of this node for `digit`.
    ///
    /// Undecodable words are logged as errors and yield an empty set; see
    /// [`ChainLink::buddies`] for the per-kind rules.
    pub fn buddies<A>(self, digit: u8, almost_structures: &[A]) -> CellSet
    where
        A: AlmostBuddies,
    {
        match self.unpack() {
            Ok(link) => link.buddies(digit, almost_structures),
            Err(err) => {
                log::error!("cannot compute buddies: {err}");
                CellSet::new()
            }
        }
    }
}

impl From<ChainLink> for PackedLink {
    fn from(link: ChainLink) -> Self {
        let digit = link.digit();
        let strong = link.is_strong();
        let packed = match *link.node() {
            ChainNode::Normal { cell } => Self::encode_normal(cell, digit, strong),
            ChainNode::Group { cells } => {
                let slice = cells.as_slice();
                Self::encode_group(slice[0], slice[1], cells.third(), digit, strong)
            }
            ChainNode::Almost { kind, cell, index } => {
                Self::encode_almost(kind, cell, index, digit, strong)
            }
            ChainNode::SubChain { cell } => {
                Self::encode(cell, None, None, digit, strong, NodeKind::Chain)
            }
        };
        if link.is_branch() {
            packed.as_branch()
        } else {
            packed
        }
    }
}

impl TryFrom<PackedLink> for ChainLink {
    type Error = DecodeError;

    fn try_from(packed: PackedLink) -> Result<Self, Self::Error> {
        packed.unpack()
    }
}

impl Display for PackedLink {
    /// Renders the decoded link, or the raw word if it cannot be decoded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unpack() {
            Ok(link) => Display::fmt(&link, f),
            Err(_) => write!(f, "<invalid link {:#010x}>", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use deduce_core::CellMask;
    use proptest::prelude::*;

    use super::*;
    use crate::AlmostStructure;

    struct NoBuddies;

    impl AlmostStructure for NoBuddies {
        fn cell_count(&self) -> usize {
            0
        }
    }

    impl AlmostBuddies for NoBuddies {
        fn buddies_for(&self, _digit: u8) -> Option<CellMask> {
            None
        }
    }

    fn node_kind() -> impl Strategy<Value = NodeKind> {
        proptest::sample::select(NodeKind::ALL.to_vec())
    }

    #[test]
    fn test_normal_fields() {
        let link = PackedLink::encode_normal(80, 9, true);
        assert_eq!(link.cell(), 80);
        assert_eq!(link.digit(), 9);
        assert!(link.is_strong());
        assert_eq!(link.kind(), Ok(NodeKind::Normal));
        assert_eq!(link.index2(), None);
        assert_eq!(link.index3(), None);
        // unused slots of a normal node are zero
        assert_eq!(link.word() >> INDEX2_SHIFT, 0);
    }

    #[test]
    fn test_group_without_third_cell() {
        let link = PackedLink::encode_group(9, 10, None, 4, false);
        assert_eq!(link.kind(), Ok(NodeKind::Group));
        assert_eq!(link.index2(), Some(10));
        assert_eq!(link.index3(), None);
        assert_eq!(
            link.unpack(),
            Ok(ChainLink::group(GroupCells::pair(9, 10), 4, false))
        );
    }

    #[test]
    fn test_group_with_third_cell() {
        let link = PackedLink::encode_group(9, 10, Some(11), 4, true);
        assert_eq!(link.index3(), Some(11));
        assert_eq!(
            link.unpack().map(|link| *link.node()),
            Ok(ChainNode::Group {
                cells: GroupCells::triple(9, 10, 11)
            })
        );
    }

    #[test]
    fn test_almost_index_shares_group_slots() {
        let link = PackedLink::encode_almost(AlmostKind::Als, 20, 300, 2, true);
        let (high, low) = split_almost_index(300);
        assert_eq!((high, low), (2, 44));
        assert_eq!(link.index2(), Some(high));
        assert_eq!(link.index3(), Some(low));
        assert_eq!(link.almost_index(), 300);
        assert_eq!(link.kind(), Ok(NodeKind::Als));
    }

    #[test]
    fn test_encode_truncates_out_of_range_values() {
        let link = PackedLink::encode_normal(0x80 | 5, 0x10 | 3, false);
        assert_eq!(link.cell(), 5);
        assert_eq!(link.digit(), 3);
        assert_eq!(split_almost_index(0xffff), (0x7f, 0x7f));
    }

    #[test]
    fn test_unknown_kinds() {
        for tag in [6u32, 7] {
            let word = ((tag << KIND_SHIFT) | 1).cast_signed();
            let link = PackedLink::from_word(word);
            assert_eq!(
                link.kind(),
                Err(DecodeError::UnknownKind {
                    word,
                    kind: u8::try_from(tag).unwrap()
                })
            );
            assert!(link.unpack().is_err());
            assert!(link.buddies::<NoBuddies>(1, &[]).is_empty());
            assert!(link.to_string().starts_with("<invalid link"));
        }
    }

    #[test]
    fn test_incomplete_group() {
        let link = PackedLink::encode(3, None, None, 1, true, NodeKind::Group);
        assert_eq!(
            link.unpack(),
            Err(DecodeError::IncompleteGroup { word: link.word() })
        );
    }

    #[test]
    fn test_with_almost_index_keeps_other_fields() {
        let link = PackedLink::encode_almost(AlmostKind::Ahs, 33, 16_000, 8, true).as_branch();
        let rewritten = link.with_almost_index(5);
        assert_eq!(rewritten.almost_index(), 5);
        assert_eq!(rewritten.cell(), 33);
        assert_eq!(rewritten.digit(), 8);
        assert!(rewritten.is_strong());
        assert!(rewritten.is_branch());
        assert_eq!(rewritten.kind(), Ok(NodeKind::Ahs));
    }

    #[test]
    fn test_out_of_range_cells_and_digits() {
        let word = (0x7f << INDEX1_SHIFT) | 3;
        let link = PackedLink::from_word(word);
        assert_eq!(
            link.unpack(),
            Err(DecodeError::CellOutOfRange { word, cell: 0x7f })
        );
        assert!(link.buddies::<NoBuddies>(3, &[]).is_empty());
        assert!(link.as_branch().buddies::<NoBuddies>(3, &[]).is_empty());

        let group = PackedLink::encode_group(0, 1, Some(100), 3, true);
        assert_eq!(
            group.unpack(),
            Err(DecodeError::CellOutOfRange {
                word: group.word(),
                cell: 100
            })
        );
        assert!(group.buddies::<NoBuddies>(3, &[]).is_empty());

        for digit in [0, 10, 15] {
            let link = PackedLink::encode_normal(4, digit, false);
            assert_eq!(
                link.unpack(),
                Err(DecodeError::DigitOutOfRange {
                    word: link.word(),
                    digit
                })
            );
            assert!(link.to_string().starts_with("<invalid link"));
        }
    }

    #[test]
    fn test_packed_buddies() {
        let link = PackedLink::encode_normal(0, 1, true).as_branch();
        assert_eq!(link.buddies::<NoBuddies>(1, &[]), CellSet::buddies(0));
    }

    #[test]
    fn test_display_uses_decoded_link() {
        let link = PackedLink::encode_normal(0, 5, true);
        assert_eq!(link.to_string(), "r1c1(5)=");
        assert_eq!(link.as_branch().to_string(), "*r1c1(5)=");
    }

    proptest! {
        #[test]
        fn prop_normal_round_trip(cell in 0u8..81, digit in 1u8..=9, strong in any::<bool>()) {
            let link = PackedLink::encode_normal(cell, digit, strong);
            prop_assert_eq!(link.cell(), cell);
            prop_assert_eq!(link.digit(), digit);
            prop_assert_eq!(link.is_strong(), strong);
            prop_assert_eq!(link.kind(), Ok(NodeKind::Normal));
            prop_assert_eq!(link.unpack(), Ok(ChainLink::normal(cell, digit, strong)));
        }

        #[test]
        fn prop_almost_index_split_join(index in 0u16..=MAX_ALMOST_INDEX) {
            let (high, low) = split_almost_index(index);
            prop_assert!(high <= 0x7f && low <= 0x7f);
            prop_assert_eq!(join_almost_index(high, low), index);
        }

        #[test]
        fn prop_branch_sign_does_not_leak(
            index1 in 0u8..81,
            index2 in proptest::option::of(0u8..81),
            index3 in proptest::option::of(0u8..81),
            digit in 1u8..=9,
            strong in any::<bool>(),
            kind in node_kind(),
        ) {
            let link = PackedLink::encode(index1, index2, index3, digit, strong, kind);
            let branch = link.as_branch();
            prop_assert!(!link.is_branch());
            prop_assert!(branch.is_branch());
            prop_assert_eq!(branch.digit(), link.digit());
            prop_assert_eq!(branch.is_strong(), link.is_strong());
            prop_assert_eq!(branch.cell(), link.cell());
            prop_assert_eq!(branch.index2(), link.index2());
            prop_assert_eq!(branch.index3(), link.index3());
            prop_assert_eq!(branch.kind(), link.kind());
            prop_assert_eq!(branch.almost_index(), link.almost_index());
            prop_assert_eq!(branch.without_branch(), link);
        }

        #[test]
        fn prop_typed_round_trip(
            cell in 0u8..81,
            index in 0u16..=MAX_ALMOST_INDEX,
            digit in 1u8..=9,
            strong in any::<bool>(),
            branch in any::<bool>(),
        ) {
            let mut link = ChainLink::almost(AlmostKind::Aur, cell, index, digit, strong);
            link.set_branch(branch);
            prop_assert_eq!(link.pack().unpack(), Ok(link));
        }
    }
}
