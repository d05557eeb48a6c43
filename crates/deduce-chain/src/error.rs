//! Error types for link decoding and almost-structure bookkeeping.

/// Errors produced when decoding a [`PackedLink`](crate::PackedLink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DecodeError {
    /// The kind field holds a value with no [`NodeKind`](crate::NodeKind).
    #[display("unknown node kind {kind} in link word {word:#010x}")]
    UnknownKind {
        /// The raw link word.
        word: i32,
        /// The undecodable kind bits.
        kind: u8,
    },
    /// A group node has no second cell.
    #[display("group link word {word:#010x} has fewer than two cells")]
    IncompleteGroup {
        /// The raw link word.
        word: i32,
    },
    /// A cell slot holds an index outside 0-80.
    #[display("cell index {cell} in link word {word:#010x} is outside the board")]
    CellOutOfRange {
        /// The raw link word.
        word: i32,
        /// The decoded cell index.
        cell: u8,
    },
    /// The digit field holds a value outside 1-9.
    #[display("digit {digit} in link word {word:#010x} is outside 1-9")]
    DigitOutOfRange {
        /// The raw link word.
        word: i32,
        /// The decoded digit.
        digit: u8,
    },
}

/// Errors produced while resolving almost-structure references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LinkError {
    /// A link refers to an almost-structure index outside the supplied array.
    #[display("almost-structure index {index} is out of range ({available} available)")]
    MissingAlmostStructure {
        /// The referenced index.
        index: u16,
        /// Length of the supplied array.
        available: usize,
    },
}
