//! A single candidate: one digit in one cell.

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    str::FromStr,
};

use crate::house;

/// A `(cell, digit)` pair.
///
/// Candidates order by digit first, then by cell index, which groups all
/// eliminations of one digit together when a step is reported.
///
/// # Examples
///
/// ```
/// use deduce_core::Candidate;
///
/// let a = Candidate::new(80, 1);
/// let b = Candidate::new(0, 2);
/// assert!(a < b);
///
/// assert_eq!(a.to_string(), "r9c9(1)");
/// assert_eq!("r9c9(1)".parse::<Candidate>(), Ok(a));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    cell: u8,
    digit: u8,
}

impl Candidate {
    /// Creates a candidate for `digit` (1-9) in `cell` (0-80).
    #[must_use]
    #[inline]
    pub const fn new(cell: u8, digit: u8) -> Self {
        debug_assert!(cell < 81);
        debug_assert!(digit >= 1 && digit <= 9);
        Self { cell, digit }
    }

    /// Returns the cell index (0-80).
    #[must_use]
    #[inline]
    pub const fn cell(self) -> u8 {
        self.cell
    }

    /// Returns the digit (1-9).
    #[must_use]
    #[inline]
    pub const fn digit(self) -> u8 {
        self.digit
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digit
            .cmp(&other.digit)
            .then(self.cell.cmp(&other.cell))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{}c{}({})",
            house::row_of(self.cell) + 1,
            house::column_of(self.cell) + 1,
            self.digit
        )
    }
}

/// Error returned when parsing a [`Candidate`] from `r{row}c{col}({digit})` fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseCandidateError {
    /// The text does not follow the `r{row}c{col}({digit})` shape.
    #[display("malformed candidate: {text:?}")]
    Malformed {
        /// The rejected input.
        text: String,
    },
    /// A row, column or digit is outside 1-9.
    #[display("candidate coordinate out of range: {value}")]
    OutOfRange {
        /// The offending value.
        value: u8,
    },
}

impl FromStr for Candidate {
    type Err = ParseCandidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseCandidateError::Malformed {
            text: s.to_owned(),
        };
        let bytes = s.trim().as_bytes();
        let [b'r', row, b'c', column, b'(', digit, b')'] = bytes else {
            return Err(malformed());
        };
        let mut parsed = [0; 3];
        for (slot, &byte) in parsed.iter_mut().zip([row, column, digit]) {
            if !byte.is_ascii_digit() {
                return Err(malformed());
            }
            let value = byte - b'0';
            if value == 0 {
                return Err(ParseCandidateError::OutOfRange { value });
            }
            *slot = value;
        }
        let [row, column, digit] = parsed;
        Ok(Self::new(house::cell_at(row - 1, column - 1), digit))
    }
}
