//! Sets of candidate digits (1-9).
//!
//! [`DigitSet`] keeps digits 1-9 in bits 0-8 of a `u16`. Unlike
//! [`CellSet`](crate::CellSet) it needs no cache: a 512-entry table indexed
//! by the whole mask yields the ascending digit list and count directly.
//!
//! # Examples
//!
//! ```
//! use deduce_core::DigitSet;
//!
//! let mut digits = DigitSet::new();
//! digits.insert(9);
//! digits.insert(1);
//! digits.insert(5);
//!
//! assert_eq!(digits.len(), 3);
//! assert_eq!(digits.members(), &[1, 5, 9]);
//!
//! let pair = DigitSet::from_iter([2, 3]);
//! assert_eq!(digits | pair, DigitSet::from_iter([1, 2, 3, 5, 9]));
//! assert!(!digits.intersects(pair));
//! ```

use std::{
    fmt::{self, Debug, Display},
    iter::{Copied, FusedIterator},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign},
    slice,
};

struct DigitTable {
    digits: [[u8; 9]; 512],
    counts: [u8; 512],
}

impl DigitTable {
    const fn build() -> Self {
        let mut digits = [[0; 9]; 512];
        let mut counts = [0; 512];
        let mut mask = 0;
        #[expect(clippy::cast_possible_truncation)]
        while mask < 512 {
            let mut count = 0;
            let mut bit = 0;
            while bit < 9 {
                if mask & (1 << bit) != 0 {
                    digits[mask][count] = bit as u8 + 1;
                    count += 1;
                }
                bit += 1;
            }
            counts[mask] = count as u8;
            mask += 1;
        }
        Self { digits, counts }
    }

    #[inline]
    fn digits(&self, bits: u16) -> &[u8] {
        let bits = usize::from(bits);
        &self.digits[bits][..usize::from(self.counts[bits])]
    }
}

static DIGIT_TABLE: DigitTable = DigitTable::build();

/// A set of digits in the range 1-9.
///
/// Values outside 1-9 are a precondition violation checked only in debug
/// builds.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DigitSet {
    bits: u16,
}

impl DigitSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// The set of all digits 1-9.
    pub const FULL: Self = Self { bits: 0x1ff };

    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set containing only `digit`.
    #[must_use]
    #[inline]
    pub const fn from_elem(digit: u8) -> Self {
        let mut set = Self::EMPTY;
        set.insert(digit);
        set
    }

    /// Creates a set from a raw mask where bit `d - 1` stands for digit `d`.
    ///
    /// Bits above 8 are dropped.
    #[must_use]
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            bits: bits & Self::FULL.bits,
        }
    }

    /// Returns the raw mask.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    #[inline]
    const fn bit(digit: u8) -> u16 {
        debug_assert!(digit >= 1 && digit <= 9);
        1 << (digit - 1)
    }

    /// Inserts `digit`, returning `true` if it was not already a member.
    #[inline]
    pub const fn insert(&mut self, digit: u8) -> bool {
        let bit = Self::bit(digit);
        let added = self.bits & bit == 0;
        self.bits |= bit;
        added
    }

    /// Removes `digit`, returning `true` if it was a member.
    #[inline]
    pub const fn remove(&mut self, digit: u8) -> bool {
        let bit = Self::bit(digit);
        let removed = self.bits & bit != 0;
        self.bits &= !bit;
        removed
    }

    /// Returns `true` if `digit` is a member.
    #[must_use]
    #[inline]
    pub const fn contains(self, digit: u8) -> bool {
        self.bits & Self::bit(digit) != 0
    }

    /// Removes every digit.
    #[inline]
    pub const fn clear(&mut self) {
        self.bits = 0;
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the number of digits in the set.
    #[must_use]
    #[inline]
    pub fn len(self) -> usize {
        usize::from(DIGIT_TABLE.counts[usize::from(self.bits)])
    }

    /// Returns the digits in ascending order.
    #[must_use]
    #[inline]
    pub fn members(self) -> &'static [u8] {
        DIGIT_TABLE.digits(self.bits)
    }

    /// Returns the `index`-th smallest digit.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    #[inline]
    pub fn get(self, index: usize) -> u8 {
        self.members()[index]
    }

    /// Returns the only digit if the set has exactly one.
    #[must_use]
    #[inline]
    pub fn as_single(self) -> Option<u8> {
        match self.members() {
            [digit] => Some(*digit),
            _ => None,
        }
    }

    /// Returns an iterator over the digits in ascending order.
    #[must_use]
    #[inline]
    pub fn iter(self) -> DigitSetIter {
        DigitSetIter {
            inner: self.members().iter().copied(),
        }
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns the intersection of `self` and `other`.
    #[must_use]
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns the digits of `self` that are not in `other`.
    #[must_use]
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Returns the digits 1-9 that are not in `self`.
    #[must_use]
    #[inline]
    pub const fn complement(self) -> Self {
        Self {
            bits: !self.bits & Self::FULL.bits,
        }
    }

    /// Returns `true` if `self` and `other` share at least one digit.
    #[must_use]
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Returns `true` if every digit of `self` is in `other`.
    #[must_use]
    #[inline]
    pub const fn is_subset(self, other: Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns `true` if every digit of `other` is in `self`.
    #[must_use]
    #[inline]
    pub const fn is_superset(self, other: Self) -> bool {
        other.is_subset(self)
    }

    /// Writes `self \ other` into `fins` and returns `true` if `other` covers `self`.
    #[inline]
    pub const fn is_covered_by(self, other: Self, fins: &mut Self) -> bool {
        fins.bits = self.bits & !other.bits;
        fins.bits == 0
    }
}

impl Debug for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for DigitSet {
    /// Renders the digits concatenated, e.g. `159`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.iter() {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

/// Iterator over the digits of a [`DigitSet`] in ascending order.
#[derive(Debug, Clone)]
pub struct DigitSetIter {
    inner: Copied<slice::Iter<'static, u8>>,
}

impl Iterator for DigitSetIter {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for DigitSetIter {
    #[inline]
    fn next_back(&mut self) -> Option<u8> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for DigitSetIter {}
impl FusedIterator for DigitSetIter {}

impl IntoIterator for DigitSet {
    type Item = u8;
    type IntoIter = DigitSetIter;

    fn into_iter(self) -> DigitSetIter {
        self.iter()
    }
}

impl FromIterator<u8> for DigitSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<u8> for DigitSet {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for digit in iter {
            self.insert(digit);
        }
    }
}

impl BitOr for DigitSet {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for DigitSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl BitAnd for DigitSet {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitAndAssign for DigitSet {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl Sub for DigitSet {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl SubAssign for DigitSet {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.difference(rhs);
    }
}

impl Not for DigitSet {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.complement()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_all_digits() {
        let mut set = DigitSet::new();
        for digit in 1..=9 {
            assert!(set.insert(digit));
        }
        assert_eq!(set.len(), 9);
        assert_eq!(set, DigitSet::FULL);
        assert_eq!(set.members(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_iteration_order() {
        let set = DigitSet::from_iter([9, 1, 5, 3]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 5, 9]);
        assert_eq!(set.iter().rev().collect::<Vec<_>>(), vec![9, 5, 3, 1]);
        assert_eq!(set.get(2), 5);
    }

    #[test]
    fn test_operations() {
        let a = DigitSet::from_iter([1, 2, 3]);
        let b = DigitSet::from_iter([2, 3, 4]);

        assert_eq!(a.union(b).len(), 4);
        assert_eq!(a.intersection(b).len(), 2);
        assert_eq!(a.difference(b), DigitSet::from_elem(1));
        assert_eq!((!a).len(), 6);
        assert!(DigitSet::from_elem(2).is_subset(a));
        assert!(a.is_superset(DigitSet::from_iter([1, 3])));
    }

    #[test]
    fn test_is_covered_by() {
        let mut fins = DigitSet::EMPTY;
        assert!(!DigitSet::from_iter([1, 7]).is_covered_by(DigitSet::from_elem(1), &mut fins));
        assert_eq!(fins, DigitSet::from_elem(7));
        assert!(DigitSet::from_elem(1).is_covered_by(DigitSet::FULL, &mut fins));
        assert!(fins.is_empty());
    }

    #[test]
    fn test_as_single_and_display() {
        assert_eq!(DigitSet::from_elem(4).as_single(), Some(4));
        assert_eq!(DigitSet::from_iter([4, 6]).as_single(), None);
        assert_eq!(DigitSet::from_iter([9, 1, 5]).to_string(), "159");
        assert_eq!(format!("{:?}", DigitSet::from_iter([2, 8])), "{2, 8}");
    }

    #[test]
    fn test_from_bits_drops_high_bits() {
        assert_eq!(DigitSet::from_bits(0xffff), DigitSet::FULL);
    }

    proptest! {
        #[test]
        fn prop_len_matches_popcount(bits in 0u16..512) {
            let set = DigitSet::from_bits(bits);
            prop_assert_eq!(set.len(), bits.count_ones() as usize);
            prop_assert!(set.members().windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_algebra(a in 0u16..512, b in 0u16..512) {
            let (a, b) = (DigitSet::from_bits(a), DigitSet::from_bits(b));
            prop_assert_eq!(a.intersection(b).is_empty(), !a.intersects(b));
            prop_assert_eq!(a | !a, DigitSet::FULL);
            prop_assert_eq!(a - a, DigitSet::EMPTY);
        }
    }
}
