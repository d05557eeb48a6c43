//! Chain length penalties for almost-structure nodes.
//!
//! A chain that hops through a large Almost Locked Set is harder to follow
//! than its link count suggests. Scoring adds a size-dependent penalty for
//! every ALS node so that a short chain through big structures does not
//! outrank a longer chain of plain links.
//!
//! The same policy feeds both [`Chain`](crate::Chain) scoring and
//! [`AlsMaterialization::chain_penalty`](crate::AlsMaterialization::chain_penalty),
//! so the two rankings agree.

/// Penalty added for an ALS node when no almost-structure array is available.
///
/// Legacy tuning value kept for ranking compatibility.
pub const NO_SIDE_ARRAY_ALS_PENALTY: f64 = 5.0;

/// Penalty added for an ALS node whose index is not present in the supplied
/// almost-structure array.
///
/// Legacy tuning value kept for ranking compatibility.
pub const UNRESOLVED_ALS_PENALTY: f64 = 2.0;

/// Maps the cell count of an almost-structure to a chain length penalty.
pub trait ChainPenalty {
    /// Returns the penalty for an almost-structure with `size` cells.
    ///
    /// Implementations must be monotonically non-decreasing in `size`.
    fn penalty(&self, size: usize) -> u32;
}

/// The default penalty policy.
///
/// | cells | penalty |
/// |---|---|
/// | 0-1 | 0 |
/// | 2 | 1 |
/// | 3-4 | size - 2 |
/// | 5+ | size - 3 |
///
/// # Examples
///
/// ```
/// use deduce_chain::penalty::{ChainPenalty, StandardPenalty};
///
/// assert_eq!(StandardPenalty.penalty(1), 0);
/// assert_eq!(StandardPenalty.penalty(4), 2);
/// assert_eq!(StandardPenalty.penalty(7), 4);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardPenalty;

impl ChainPenalty for StandardPenalty {
    fn penalty(&self, size: usize) -> u32 {
        let penalty = match size {
            0 | 1 => 0,
            2 => 1,
            3 | 4 => size - 2,
            _ => size - 3,
        };
        u32::try_from(penalty).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_small_sizes() {
        let penalties: Vec<_> = (0..=6).map(|size| StandardPenalty.penalty(size)).collect();
        assert_eq!(penalties, vec![0, 0, 1, 1, 2, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_monotonic(size in 0usize..200) {
            prop_assert!(StandardPenalty.penalty(size) <= StandardPenalty.penalty(size + 1));
        }
    }
}
