//! Core data structures for a logical sudoku solver.
//!
//! This crate provides the compact set types that deduction techniques scan
//! houses with, plus the small value types they report.
//!
//! # Overview
//!
//! 1. **Lookup tables** - [`table`]: the 256-entry byte-chunk table used for
//!    member enumeration.
//! 2. **Bitsets**
//!    - [`candidate_set`]: [`CandidateSet`], a two-word bitset generic over its
//!      domain, with [`CellMask`] (81 cells) and [`HouseMask`] (9 house cells).
//!    - [`cell_set`]: [`CellSet`], a cell set that caches its ordered member list.
//!    - [`digit_set`]: [`DigitSet`], digits 1-9 with a table-driven member list.
//! 3. **Board geometry** - [`house`]: rows, columns, boxes and the peer table.
//! 4. **Values** - [`candidate`]: [`Candidate`], a `(cell, digit)` pair.
//!
//! None of these types are synchronized. A search that fans out to several
//! threads clones an independent snapshot for each worker.
//!
//! # Examples
//!
//! ```
//! use deduce_core::{CellSet, DigitSet, House};
//!
//! // Cells of row 0 that also see cell 40.
//! let row = CellSet::from(House::Row { y: 0 }.cells());
//! let seen = row.intersection(&CellSet::buddies(40));
//! assert_eq!(seen.members(), &[4]);
//!
//! let digits = DigitSet::from_iter([3, 1, 2]);
//! assert_eq!(digits.members(), &[1, 2, 3]);
//! ```

pub mod candidate;
pub mod candidate_set;
pub mod cell_set;
pub mod digit_set;
pub mod house;
pub mod table;

pub use self::{
    candidate::{Candidate, ParseCandidateError},
    candidate_set::{CandidateSet, CellDomain, CellMask, HouseDomain, HouseMask, SetDomain},
    cell_set::CellSet,
    digit_set::DigitSet,
    house::House,
};
