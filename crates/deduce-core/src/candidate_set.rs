//! Two-word bitsets over a fixed element domain.
//!
//! [`CandidateSet`] stores membership of elements `0..D::SIZE` in two `u64`
//! words: `mask1` holds elements 0-63 and `mask2` holds the remainder. The
//! domain is chosen by a [`SetDomain`] type parameter, so a set of board cells
//! and a set of house cells cannot be mixed up.
//!
//! The type is `Copy` and every operation is `const`, which makes it suitable
//! for static lookup tables such as the peer table in [`house`](crate::house).
//! [`CellSet`](crate::CellSet) layers a cached member list on top of the
//! 81-cell specialization.
//!
//! # Examples
//!
//! ```
//! use deduce_core::CellMask;
//!
//! let a = CellMask::from_iter([0, 10, 80]);
//! let b = CellMask::from_iter([10, 40]);
//!
//! assert_eq!(a | b, CellMask::from_iter([0, 10, 40, 80]));
//! assert_eq!(a & b, CellMask::from_iter([10]));
//! assert_eq!(a - b, CellMask::from_iter([0, 80]));
//! assert_eq!((!a).len(), 78);
//! ```

use std::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    iter::FusedIterator,
    marker::PhantomData,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign},
};

/// Fixes the number of elements a [`CandidateSet`] can hold.
pub trait SetDomain {
    /// Number of elements in the domain (at most 128).
    const SIZE: u8;
}

/// The 81 cells of a board, indexed row-major (`row * 9 + column`).
#[derive(Debug, Clone, Copy)]
pub struct CellDomain;

impl SetDomain for CellDomain {
    const SIZE: u8 = 81;
}

/// The 9 cells of a single house, indexed 0-8.
#[derive(Debug, Clone, Copy)]
pub struct HouseDomain;

impl SetDomain for HouseDomain {
    const SIZE: u8 = 9;
}

/// A set of board cells without a member cache.
pub type CellMask = CandidateSet<CellDomain>;

/// A set of cell positions within one house.
pub type HouseMask = CandidateSet<HouseDomain>;

const fn full_low(size: u8) -> u64 {
    if size >= 64 {
        u64::MAX
    } else {
        (1 << size) - 1
    }
}

const fn full_high(size: u8) -> u64 {
    if size <= 64 {
        0
    } else if size >= 128 {
        u64::MAX
    } else {
        (1 << (size - 64)) - 1
    }
}

/// A bitset over the elements of domain `D`.
///
/// Element `i` is a member exactly when bit `i` is set. Bits at or above
/// `D::SIZE` are always clear.
///
/// Values passed to [`insert`](Self::insert), [`remove`](Self::remove) and
/// [`contains`](Self::contains) must lie inside the domain. This is checked
/// only in debug builds.
pub struct CandidateSet<D> {
    mask1: u64,
    mask2: u64,
    _domain: PhantomData<fn() -> D>,
}

impl<D> Clone for CandidateSet<D> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for CandidateSet<D> {}

impl<D> PartialEq for CandidateSet<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.mask1 == other.mask1 && self.mask2 == other.mask2
    }
}

impl<D> Eq for CandidateSet<D> {}

impl<D> Hash for CandidateSet<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mask1.hash(state);
        self.mask2.hash(state);
    }
}

impl<D> Default for CandidateSet<D> {
    #[inline]
    fn default() -> Self {
        Self::from_masks(0, 0)
    }
}

impl<D> Debug for CandidateSet<D>
where
    D: SetDomain,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<D> CandidateSet<D> {
    /// Creates a set from raw words without masking them to the domain.
    const fn from_masks(mask1: u64, mask2: u64) -> Self {
        Self {
            mask1,
            mask2,
            _domain: PhantomData,
        }
    }

    /// Returns the raw `(mask1, mask2)` words.
    #[must_use]
    #[inline]
    pub const fn masks(self) -> (u64, u64) {
        (self.mask1, self.mask2)
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.mask1 == 0 && self.mask2 == 0
    }

    /// Returns the number of members.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        (self.mask1.count_ones() + self.mask2.count_ones()) as usize
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self::from_masks(self.mask1 | other.mask1, self.mask2 | other.mask2)
    }

    /// Returns the intersection of `self` and `other`.
    #[must_use]
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self::from_masks(self.mask1 & other.mask1, self.mask2 & other.mask2)
    }

    /// Returns the members of `self` that are not in `other`.
    #[must_use]
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self::from_masks(self.mask1 & !other.mask1, self.mask2 & !other.mask2)
    }

    /// Returns `true` if `self` and `other` share at least one member.
    #[must_use]
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.mask1 & other.mask1 != 0 || self.mask2 & other.mask2 != 0
    }

    /// Returns `true` if every member of `self` is in `other`.
    #[must_use]
    #[inline]
    pub const fn is_subset(self, other: Self) -> bool {
        self.mask1 & !other.mask1 == 0 && self.mask2 & !other.mask2 == 0
    }

    /// Returns `true` if every member of `other` is in `self`.
    #[must_use]
    #[inline]
    pub const fn is_superset(self, other: Self) -> bool {
        other.is_subset(self)
    }

    /// Computes `self \ other` into `fins` and reports whether `other` covers `self`.
    ///
    /// Both results come out of a single pass over the words: `fins` receives
    /// the members left uncovered, and the return value is `true` exactly when
    /// there are none. Fish searches use this to check base/cover coverage and
    /// harvest fin cells at the same time.
    ///
    /// # Examples
    ///
    /// ```
    /// use deduce_core::CellMask;
    ///
    /// let base = CellMask::from_iter([0, 1, 2]);
    /// let cover = CellMask::from_iter([0, 2, 3]);
    /// let mut fins = CellMask::EMPTY;
    ///
    /// assert!(!base.is_covered_by(cover, &mut fins));
    /// assert_eq!(fins, CellMask::from_iter([1]));
    /// ```
    #[inline]
    pub const fn is_covered_by(self, other: Self, fins: &mut Self) -> bool {
        fins.mask1 = self.mask1 & !other.mask1;
        fins.mask2 = self.mask2 & !other.mask2;
        fins.mask1 == 0 && fins.mask2 == 0
    }

    /// Removes every member.
    #[inline]
    pub const fn clear(&mut self) {
        self.mask1 = 0;
        self.mask2 = 0;
    }
}

impl<D> CandidateSet<D>
where
    D: SetDomain,
{
    /// The empty set.
    pub const EMPTY: Self = Self::from_masks(0, 0);

    /// The set containing every element of the domain.
    pub const FULL: Self = Self::from_masks(full_low(D::SIZE), full_high(D::SIZE));

    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set containing only `value`.
    #[must_use]
    #[inline]
    pub const fn from_elem(value: u8) -> Self {
        let mut set = Self::EMPTY;
        set.insert(value);
        set
    }

    /// Creates a set from raw words, dropping bits outside the domain.
    #[must_use]
    #[inline]
    pub const fn from_bits(mask1: u64, mask2: u64) -> Self {
        Self::from_masks(mask1 & Self::FULL.mask1, mask2 & Self::FULL.mask2)
    }

    /// Inserts `value`, returning `true` if it was not already a member.
    #[inline]
    pub const fn insert(&mut self, value: u8) -> bool {
        debug_assert!(value < D::SIZE);
        if value < 64 {
            let bit = 1 << value;
            let added = self.mask1 & bit == 0;
            self.mask1 |= bit;
            added
        } else {
            let bit = 1 << (value - 64);
            let added = self.mask2 & bit == 0;
            self.mask2 |= bit;
            added
        }
    }

    /// Removes `value`, returning `true` if it was a member.
    #[inline]
    pub const fn remove(&mut self, value: u8) -> bool {
        debug_assert!(value < D::SIZE);
        if value < 64 {
            let bit = 1 << value;
            let removed = self.mask1 & bit != 0;
            self.mask1 &= !bit;
            removed
        } else {
            let bit = 1 << (value - 64);
            let removed = self.mask2 & bit != 0;
            self.mask2 &= !bit;
            removed
        }
    }

    /// Returns `true` if `value` is a member.
    #[must_use]
    #[inline]
    pub const fn contains(self, value: u8) -> bool {
        debug_assert!(value < D::SIZE);
        if value < 64 {
            self.mask1 & (1 << value) != 0
        } else {
            self.mask2 & (1 << (value - 64)) != 0
        }
    }

    /// Returns the elements of the domain that are not members.
    #[must_use]
    #[inline]
    pub const fn complement(self) -> Self {
        Self::from_masks(
            !self.mask1 & Self::FULL.mask1,
            !self.mask2 & Self::FULL.mask2,
        )
    }

    /// Adds every element of the domain.
    #[inline]
    pub const fn fill(&mut self) {
        *self = Self::FULL;
    }

    /// Returns the smallest member.
    #[must_use]
    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn first(self) -> Option<u8> {
        if self.mask1 != 0 {
            Some(self.mask1.trailing_zeros() as u8)
        } else if self.mask2 != 0 {
            Some(self.mask2.trailing_zeros() as u8 + 64)
        } else {
            None
        }
    }

    /// Returns the only member if the set has exactly one.
    #[must_use]
    #[inline]
    pub const fn as_single(self) -> Option<u8> {
        if self.len() == 1 { self.first() } else { None }
    }

    /// Returns an iterator over the members in ascending order.
    #[must_use]
    #[inline]
    pub fn iter(self) -> Members<D> {
        Members { set: self }
    }
}

/// Iterator over the members of a [`CandidateSet`] in ascending order.
#[derive(Clone)]
pub struct Members<D> {
    set: CandidateSet<D>,
}

impl<D> Debug for Members<D>
where
    D: SetDomain,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Members").field("rest", &self.set).finish()
    }
}

impl<D> Iterator for Members<D>
where
    D: SetDomain,
{
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        let value = self.set.first()?;
        self.set.remove(value);
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.set.len();
        (len, Some(len))
    }
}

impl<D> ExactSizeIterator for Members<D> where D: SetDomain {}
impl<D> FusedIterator for Members<D> where D: SetDomain {}

impl<D> IntoIterator for CandidateSet<D>
where
    D: SetDomain,
{
    type Item = u8;
    type IntoIter = Members<D>;

    fn into_iter(self) -> Members<D> {
        self.iter()
    }
}

impl<D> FromIterator<u8> for CandidateSet<D>
where
    D: SetDomain,
{
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl<D> Extend<u8> for CandidateSet<D>
where
    D: SetDomain,
{
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<D> BitOr for CandidateSet<D> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<D> BitOrAssign for CandidateSet<D> {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl<D> BitAnd for CandidateSet<D> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl<D> BitAndAssign for CandidateSet<D> {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl<D> Sub for CandidateSet<D> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl<D> SubAssign for CandidateSet<D> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.difference(rhs);
    }
}

impl<D> Not for CandidateSet<D>
where
    D: SetDomain,
{
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

    fn cell_mask() -> impl Strategy<Value = CellMask> {
        (any::<u64>(), any::<u64>()).prop_map(|(m1, m2)| CellMask::from_bits(m1, m2))
    }

    #[test]
    fn test_constants() {
        assert_eq!(CellMask::EMPTY.len(), 0);
        assert_eq!(CellMask::FULL.len(), 81);
        assert_eq!(HouseMask::FULL.len(), 9);
        assert_eq!(CellMask::FULL.masks(), (u64::MAX, 0x1_ffff));
        assert_eq!(HouseMask::FULL.masks(), (0x1ff, 0));
    }

    #[test]
    fn test_insert_remove_across_word_boundary() {
        let mut set = CellMask::new();
        assert!(set.insert(63));
        assert!(set.insert(64));
        assert!(!set.insert(64));
        assert!(set.contains(63));
        assert!(set.contains(64));
        assert_eq!(set.masks(), (1 << 63, 1));

        assert!(set.remove(63));
        assert!(!set.remove(63));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![64]);
    }

    #[test]
    fn test_complement_stays_in_domain() {
        let set = CellMask::from_iter([0, 80]);
        let complement = set.complement();
        assert_eq!(complement.len(), 79);
        assert!(!complement.contains(80));
        assert_eq!(complement.masks().1 >> 17, 0);
    }

    #[test]
    fn test_from_bits_drops_out_of_domain() {
        let set = HouseMask::from_bits(u64::MAX, u64::MAX);
        assert_eq!(set, HouseMask::FULL);
    }

    #[test]
    fn test_first_and_as_single() {
        assert_eq!(CellMask::EMPTY.first(), None);
        assert_eq!(CellMask::from_iter([70, 75]).first(), Some(70));
        assert_eq!(CellMask::from_elem(42).as_single(), Some(42));
        assert_eq!(CellMask::from_iter([1, 2]).as_single(), None);
    }

    #[test]
    fn test_is_covered_by_reports_fins() {
        let base = CellMask::from_iter([3, 12, 66]);
        let mut fins = CellMask::FULL;

        assert!(base.is_covered_by(CellMask::from_iter([3, 12, 66, 70]), &mut fins));
        assert!(fins.is_empty());

        assert!(!base.is_covered_by(CellMask::from_iter([3]), &mut fins));
        assert_eq!(fins, CellMask::from_iter([12, 66]));
    }

    #[test]
    fn test_iteration_order() {
        let set = CellMask::from_iter([80, 5, 64, 0, 63]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 5, 63, 64, 80]);
        assert_eq!(set.iter().len(), 5);
    }

    proptest! {
        #[test]
        fn prop_intersection_empty_iff_disjoint(a in cell_mask(), b in cell_mask()) {
            prop_assert_eq!(a.intersection(b).is_empty(), !a.intersects(b));
        }

        #[test]
        fn prop_union_with_complement_is_full(a in cell_mask()) {
            prop_assert_eq!(a.union(a.complement()), CellMask::FULL);
        }

        #[test]
        fn prop_difference_with_self_is_empty(a in cell_mask()) {
            prop_assert_eq!(a.difference(a), CellMask::EMPTY);
        }

        #[test]
        fn prop_covered_matches_subset(a in cell_mask(), b in cell_mask()) {
            let mut fins = CellMask::EMPTY;
            prop_assert_eq!(a.is_covered_by(b, &mut fins), a.is_subset(b));
            prop_assert_eq!(fins, a - b);
        }

        #[test]
        fn prop_len_matches_iteration(a in cell_mask()) {
            prop_assert_eq!(a.iter().count(), a.len());
            prop_assert!(a.iter().all(|v| a.contains(v)));
        }
    }
}
