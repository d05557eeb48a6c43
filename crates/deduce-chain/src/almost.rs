//! Almost-structures referenced from chain links.
//!
//! ALS, AHS and AUR nodes do not carry their cells inline. A link stores an
//! index into a side array owned by the step that produced the chain, and
//! the element type of that array only has to implement the traits below.

use std::{
    cell::OnceCell,
    fmt::{self, Display},
};

use deduce_core::{CellMask, CellSet, DigitSet, house};
use tinyvec::TinyVec;

use crate::penalty::{ChainPenalty as _, StandardPenalty};

/// An element of a step's almost-structure side array.
pub trait AlmostStructure {
    /// Returns the number of cells the structure spans.
    fn cell_count(&self) -> usize;

    /// Returns the chain length penalty for passing through this structure.
    ///
    /// Defaults to [`StandardPenalty`] applied to [`cell_count`](Self::cell_count).
    fn chain_penalty(&self) -> u32 {
        StandardPenalty.penalty(self.cell_count())
    }
}

/// An almost-structure that knows its per-digit buddy sets.
pub trait AlmostBuddies: AlmostStructure {
    /// Returns the cells that see every cell of the structure holding `digit`,
    /// or `None` if the structure does not track `digit`.
    fn buddies_for(&self, digit: u8) -> Option<CellMask>;
}

/// The cells and digits of an Almost Locked Set, as stored alongside a step.
///
/// Both lists are append-only and keep insertion order; duplicates are not
/// filtered. The chain penalty is computed from the cell count on first use
/// and cached.
///
/// # Examples
///
/// ```
/// use deduce_chain::{AlmostStructure, AlsMaterialization};
///
/// let mut als = AlsMaterialization::new();
/// for cell in [0, 1, 2] {
///     als.add_index(cell);
/// }
/// for digit in [4, 5, 6, 7] {
///     als.add_digit(digit);
/// }
/// assert_eq!(als.cell_count(), 3);
/// assert_eq!(als.digit_set().len(), 4);
/// assert_eq!(als.chain_penalty(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlsMaterialization {
    indices: TinyVec<[u8; 8]>,
    digits: TinyVec<[u8; 9]>,
    penalty: OnceCell<u32>,
}

impl AlsMaterialization {
    /// Creates an empty materialization.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell index.
    pub fn add_index(&mut self, cell: u8) {
        debug_assert!(cell < 81);
        self.indices.push(cell);
        self.penalty.take();
    }

    /// Appends a digit.
    pub fn add_digit(&mut self, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.digits.push(digit);
    }

    /// Returns the cell indices in insertion order.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Returns the digits in insertion order.
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Returns the cells as a set.
    #[must_use]
    pub fn cells(&self) -> CellSet {
        self.indices.iter().copied().collect::<CellMask>().into()
    }

    /// Returns the digits as a set.
    #[must_use]
    pub fn digit_set(&self) -> DigitSet {
        self.digits.iter().copied().collect()
    }
}

impl PartialEq for AlsMaterialization {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices && self.digits == other.digits
    }
}

impl Eq for AlsMaterialization {}

impl AlmostStructure for AlsMaterialization {
    fn cell_count(&self) -> usize {
        self.indices.len()
    }

    fn chain_penalty(&self) -> u32 {
        *self
            .penalty
            .get_or_init(|| StandardPenalty.penalty(self.indices.len()))
    }
}

impl Display for AlsMaterialization {
    /// Renders as e.g. `r1c1,r1c2{45}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.indices.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "r{}c{}", house::row_of(cell) + 1, house::column_of(cell) + 1)?;
        }
        f.write_str("{")?;
        for digit in &self.digits {
            write!(f, "{digit}")?;
        }
        f.write_str("}")
    }
}
