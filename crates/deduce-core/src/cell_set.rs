//! Sets of board cells with a lazily materialized member list.
//!
//! [`CellSet`] wraps a [`CellMask`] and caches the ordered list of its
//! members. Every mutating call drops the cache; the first read afterwards
//! (`len`, `get`, `iter`, `members`) rebuilds it a byte at a time from
//! [`MASK_TABLES`](crate::table::MASK_TABLES).
//!
//! Search code typically builds a set, mutates it in a tight loop, and then
//! walks its members a few times, so paying for enumeration once per
//! mutation burst is cheaper than scanning 81 bits on every read.
//!
//! Cloning a `CellSet` is a deep copy: two clones never observe each other's
//! mutations, which is what lets a search branch freely.
//!
//! # Examples
//!
//! ```
//! use deduce_core::CellSet;
//!
//! let mut set = CellSet::new();
//! set.insert(80);
//! set.insert(3);
//! set.insert(64);
//!
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.members(), &[3, 64, 80]);
//! assert_eq!(set.get(1), 64);
//!
//! let peers = CellSet::buddies(0);
//! assert_eq!(peers.len(), 20);
//! assert!(!peers.contains(0));
//! ```

use std::{
    cell::OnceCell,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    iter::Copied,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign},
    slice,
};

use tinyvec::ArrayVec;

use crate::{CellMask, house, table::MASK_TABLES};

type MemberList = ArrayVec<[u8; 81]>;

/// A set of board cells (0-80) with cached ordered enumeration.
#[derive(Clone, Default)]
pub struct CellSet {
    mask: CellMask,
    members: OnceCell<MemberList>,
}

impl PartialEq for CellSet {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask
    }
}

impl Eq for CellSet {}

impl Hash for CellSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mask.hash(state);
    }
}

impl Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for CellSet {
    /// Renders cells in `r{row}c{col}` notation, 1-based.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(
                f,
                "r{}c{}",
                house::row_of(cell) + 1,
                house::column_of(cell) + 1
            )?;
        }
        Ok(())
    }
}

impl From<CellMask> for CellSet {
    #[inline]
    fn from(mask: CellMask) -> Self {
        Self {
            mask,
            members: OnceCell::new(),
        }
    }
}

impl From<&CellSet> for CellMask {
    #[inline]
    fn from(set: &CellSet) -> Self {
        set.mask
    }
}

impl CellSet {
    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::from(CellMask::EMPTY)
    }

    /// Creates a set containing all 81 cells.
    #[must_use]
    #[inline]
    pub fn full() -> Self {
        Self::from(CellMask::FULL)
    }

    /// Creates a set containing only `cell`.
    #[must_use]
    #[inline]
    pub fn from_elem(cell: u8) -> Self {
        Self::from(CellMask::from_elem(cell))
    }

    /// Returns the peers ("buddies") of `cell`: every other cell sharing a
    /// row, column or box with it.
    #[must_use]
    #[inline]
    pub fn buddies(cell: u8) -> Self {
        Self::from(house::peers(cell))
    }

    /// Returns the underlying mask.
    #[must_use]
    #[inline]
    pub fn mask(&self) -> CellMask {
        self.mask
    }

    #[inline]
    fn invalidate(&mut self) {
        self.members.take();
    }

    fn materialize(mask: CellMask) -> MemberList {
        let (mask1, mask2) = mask.masks();
        let mut members = MemberList::new();
        MASK_TABLES.extend_members(mask1, 0, 64, &mut members);
        MASK_TABLES.extend_members(mask2, 64, 17, &mut members);
        members
    }

    /// Returns the members in ascending order, materializing them if needed.
    #[must_use]
    #[inline]
    pub fn members(&self) -> &[u8] {
        self.members.get_or_init(|| Self::materialize(self.mask))
    }

    /// Returns `true` if the member list is currently materialized.
    #[must_use]
    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.members.get().is_some()
    }

    /// Returns the number of members.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Returns the `index`-th smallest member.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.members()[index]
    }

    /// Returns an iterator over the members in ascending order.
    #[inline]
    pub fn iter(&self) -> Copied<slice::Iter<'_, u8>> {
        self.members().iter().copied()
    }

    /// Returns `true` if `cell` is a member.
    #[must_use]
    #[inline]
    pub fn contains(&self, cell: u8) -> bool {
        self.mask.contains(cell)
    }

    /// Inserts `cell`, returning `true` if it was not already a member.
    #[inline]
    pub fn insert(&mut self, cell: u8) -> bool {
        let added = self.mask.insert(cell);
        if added {
            self.invalidate();
        }
        added
    }

    /// Removes `cell`, returning `true` if it was a member.
    #[inline]
    pub fn remove(&mut self, cell: u8) -> bool {
        let removed = self.mask.remove(cell);
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Removes every member.
    #[inline]
    pub fn clear(&mut self) {
        self.mask.clear();
        self.invalidate();
    }

    /// Adds all 81 cells.
    #[inline]
    pub fn fill(&mut self) {
        self.mask.fill();
        self.invalidate();
    }

    /// Replaces the contents with `mask`.
    #[inline]
    pub fn set_mask(&mut self, mask: CellMask) {
        self.mask = mask;
        self.invalidate();
    }

    /// Adds every member of `other`.
    #[inline]
    pub fn union_with(&mut self, other: &Self) {
        self.set_mask(self.mask | other.mask);
    }

    /// Keeps only the members that are also in `other`.
    #[inline]
    pub fn intersect_with(&mut self, other: &Self) {
        self.set_mask(self.mask & other.mask);
    }

    /// Removes every member of `other`.
    #[inline]
    pub fn subtract_with(&mut self, other: &Self) {
        self.set_mask(self.mask - other.mask);
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self::from(self.mask | other.mask)
    }

    /// Returns the intersection of `self` and `other`.
    #[must_use]
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::from(self.mask & other.mask)
    }

    /// Returns the members of `self` that are not in `other`.
    #[must_use]
    #[inline]
    pub fn difference(&self, other: &Self) -> Self {
        Self::from(self.mask - other.mask)
    }

    /// Returns the cells that are not members.
    #[must_use]
    #[inline]
    pub fn complement(&self) -> Self {
        Self::from(!self.mask)
    }

    /// Returns `true` if `self` and `other` share at least one cell.
    #[must_use]
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.mask.intersects(other.mask)
    }

    /// Returns `true` if every member of `self` is in `other`.
    #[must_use]
    #[inline]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.mask.is_subset(other.mask)
    }

    /// Returns `true` if every member of `other` is in `self`.
    #[must_use]
    #[inline]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.mask.is_superset(other.mask)
    }

    /// Writes `self \ other` into `fins` and returns `true` if `other` covers `self`.
    ///
    /// See [`CellMask::is_covered_by`].
    #[inline]
    pub fn is_covered_by(&self, other: &Self, fins: &mut Self) -> bool {
        let mut residual = CellMask::EMPTY;
        let covered = self.mask.is_covered_by(other.mask, &mut residual);
        fins.set_mask(residual);
        covered
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = u8;
    type IntoIter = Copied<slice::Iter<'a, u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<u8> for CellSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::from(CellMask::from_iter(iter))
    }
}

impl Extend<u8> for CellSet {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let mut mask = self.mask;
        mask.extend(iter);
        self.set_mask(mask);
    }
}

impl BitOr for &CellSet {
    type Output = CellSet;

    #[inline]
    fn bitor(self, rhs: Self) -> CellSet {
        self.union(rhs)
    }
}

impl BitOrAssign<&CellSet> for CellSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: &CellSet) {
        self.union_with(rhs);
    }
}

impl BitAnd for &CellSet {
    type Output = CellSet;

    #[inline]
    fn bitand(self, rhs: Self) -> CellSet {
        self.intersection(rhs)
    }
}

impl BitAndAssign<&CellSet> for CellSet {
    #[inline]
    fn bitand_assign(&mut self, rhs: &CellSet) {
        self.intersect_with(rhs);
    }
}

impl Sub for &CellSet {
    type Output = CellSet;

    #[inline]
    fn sub(self, rhs: Self) -> CellSet {
        self.difference(rhs)
    }
}

impl SubAssign<&CellSet> for CellSet {
    #[inline]
    fn sub_assign(&mut self, rhs: &CellSet) {
        self.subtract_with(rhs);
    }
}

impl Not for &CellSet {
    type Output = CellSet;

    #[inline]
    fn not(self) -> CellSet {
        self.complement()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rayon::prelude::*;

    use super::*;

    fn cell_set() -> impl Strategy<Value = CellSet> {
        proptest::collection::vec(0..81u8, 0..40).prop_map(CellSet::from_iter)
    }

    #[test]
    fn test_lazy_materialization() {
        let mut set = CellSet::from_iter([10, 70]);
        assert!(!set.is_materialized());

        assert_eq!(set.len(), 2);
        assert!(set.is_materialized());

        set.insert(11);
        assert!(!set.is_materialized());
        assert_eq!(set.members(), &[10, 11, 70]);

        // no-op mutations keep the cache
        assert!(!set.insert(11));
        assert!(set.is_materialized());
        assert!(!set.remove(12));
        assert!(set.is_materialized());
    }

    #[test]
    fn test_in_place_operations_invalidate() {
        let mut set = CellSet::from_iter([1, 2, 3]);
        assert_eq!(set.len(), 3);

        set.union_with(&CellSet::from_iter([79, 80]));
        assert_eq!(set.members(), &[1, 2, 3, 79, 80]);

        set.intersect_with(&CellSet::from_iter([2, 3, 80]));
        assert_eq!(set.members(), &[2, 3, 80]);

        set.subtract_with(&CellSet::from_elem(3));
        assert_eq!(set.members(), &[2, 80]);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);

        set.fill();
        assert_eq!(set.len(), 81);
        assert_eq!(set.get(80), 80);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = CellSet::from_iter([4, 40]);
        assert_eq!(original.len(), 2);
        let mut branch = original.clone();

        branch.insert(41);
        original.remove(4);

        assert_eq!(original.members(), &[40]);
        assert_eq!(branch.members(), &[4, 40, 41]);
    }

    #[test]
    fn test_is_covered_by_writes_fins() {
        let base = CellSet::from_iter([0, 9, 18, 27]);
        let cover = CellSet::from_iter([0, 9, 18]);
        let mut fins = CellSet::from_iter([50]);
        assert_eq!(fins.len(), 1);

        assert!(!base.is_covered_by(&cover, &mut fins));
        assert_eq!(fins.members(), &[27]);

        assert!(cover.is_covered_by(&base, &mut fins));
        assert!(fins.is_empty());
        assert_eq!(fins.len(), 0);
    }

    #[test]
    fn test_operators() {
        let a = CellSet::from_iter([0, 1, 2]);
        let b = CellSet::from_iter([2, 3]);
        assert_eq!((&a | &b).members(), &[0, 1, 2, 3]);
        assert_eq!((&a & &b).members(), &[2]);
        assert_eq!((&a - &b).members(), &[0, 1]);
        assert_eq!((!&a).len(), 78);

        let mut c = a.clone();
        c |= &b;
        c -= &CellSet::from_elem(0);
        c &= &CellSet::from_iter([1, 3]);
        assert_eq!(c.members(), &[1, 3]);
    }

    #[test]
    fn test_display() {
        let set = CellSet::from_iter([0, 10, 80]);
        assert_eq!(set.to_string(), "r1c1,r2c2,r9c9");
        assert_eq!(CellSet::new().to_string(), "");
    }

    #[test]
    fn test_buddies() {
        let peers = CellSet::buddies(40);
        assert_eq!(peers.len(), 20);
        for cell in [36, 44, 4, 76, 30, 50] {
            assert!(peers.contains(cell), "missing {cell}");
        }
        assert!(!peers.contains(40));
        assert!(!peers.contains(0));
    }

    #[test]
    fn test_per_worker_clones() {
        let snapshot = CellSet::from_iter([0, 1, 2, 3]);
        let results: Vec<usize> = (0..8u8)
            .map(|_| snapshot.clone())
            .collect::<Vec<_>>()
            .into_par_iter()
            .enumerate()
            .map(|(i, mut set)| {
                set.insert(40 + u8::try_from(i).unwrap());
                set.len()
            })
            .collect();

        assert!(results.iter().all(|&len| len == 5));
        assert_eq!(snapshot.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_members_match_mask(set in cell_set()) {
            let expected: Vec<u8> = set.mask().iter().collect();
            prop_assert_eq!(set.members(), expected.as_slice());
            prop_assert_eq!(set.len(), set.mask().len());
        }

        #[test]
        fn prop_set_algebra(a in cell_set(), b in cell_set()) {
            prop_assert_eq!(a.intersection(&b).is_empty(), !a.intersects(&b));
            prop_assert_eq!(a.union(&a.complement()), CellSet::full());
            prop_assert_eq!(a.difference(&a), CellSet::new());
        }
    }
}
