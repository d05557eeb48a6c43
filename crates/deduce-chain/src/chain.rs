//! Chains of links with complexity-aware length scoring.
//!
//! A [`Chain`] owns its backing links and exposes a `start..end` window over
//! them; only links inside the window take part in scoring, iteration and
//! serialization. Length is a ranking key: every link counts once and every
//! ALS node adds a penalty for the effort of following it.

use std::{cell::Cell, ops::Range, slice};

use deduce_core::Candidate;

use crate::{
    AlmostKind, AlmostStructure, ChainLink, ChainNode, DecodeError, PackedLink,
    penalty::{NO_SIDE_ARRAY_ALS_PENALTY, UNRESOLVED_ALS_PENALTY},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoringMode {
    Plain,
    SideArray,
}

#[derive(Debug, Clone, Copy)]
struct CachedLength {
    mode: ScoringMode,
    value: u32,
}

/// A sequence of chain links with a scoring window.
///
/// The computed length is memoized per scoring mode ([`length`](Self::length)
/// or [`length_with`](Self::length_with)). Every mutating method drops the
/// memo; a caller that swaps the almost-structure array between calls to
/// `length_with` must call [`invalidate_length`](Self::invalidate_length).
///
/// `Chain` is `Send` but not `Sync`. Clone it to hand a snapshot to another
/// thread.
///
/// # Examples
///
/// ```
/// use deduce_chain::{Chain, ChainLink};
///
/// let mut chain = Chain::new();
/// chain.push(ChainLink::normal(0, 1, true));
/// chain.push(ChainLink::normal(8, 1, false));
/// chain.push(ChainLink::normal(80, 1, true));
/// assert_eq!(chain.length(), 3);
///
/// chain.set_window(1..3);
/// assert_eq!(chain.len(), 2);
/// assert_eq!(chain.length(), 2);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<PackedLink>", into = "Vec<PackedLink>")
)]
pub struct Chain {
    links: Vec<ChainLink>,
    start: usize,
    end: usize,
    length: Cell<Option<CachedLength>>,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty chain with room for `capacity` links.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Decodes a chain from packed words; the window covers all of them.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] among the words.
    pub fn from_packed(words: &[PackedLink]) -> Result<Self, DecodeError> {
        words.iter().map(|word| word.unpack()).collect()
    }

    /// Encodes the links inside the window.
    #[must_use]
    pub fn to_packed(&self) -> Vec<PackedLink> {
        self.links().iter().map(ChainLink::pack).collect()
    }

    /// Appends a link to the backing storage and extends the window to it.
    pub fn push(&mut self, link: ChainLink) {
        self.links.push(link);
        self.end = self.links.len();
        self.invalidate_length();
    }

    /// Restricts scoring and iteration to `window` of the backing links.
    ///
    /// # Panics
    ///
    /// Panics if `window` is reversed or reaches past the backing storage.
    pub fn set_window(&mut self, window: Range<usize>) {
        assert!(
            window.start <= window.end && window.end <= self.links.len(),
            "window {window:?} is outside 0..{}",
            self.links.len()
        );
        self.start = window.start;
        self.end = window.end;
        self.invalidate_length();
    }

    /// Returns the current window.
    #[must_use]
    pub fn window(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the links inside the window.
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links[self.start..self.end]
    }

    /// Returns the links inside the window for in-place editing.
    pub fn links_mut(&mut self) -> &mut [ChainLink] {
        self.invalidate_length();
        &mut self.links[self.start..self.end]
    }

    /// Returns an iterator over the links inside the window.
    pub fn iter(&self) -> slice::Iter<'_, ChainLink> {
        self.links().iter()
    }

    /// Returns every backing link, including those outside the window.
    #[must_use]
    pub fn backing(&self) -> &[ChainLink] {
        &self.links
    }

    /// Replaces the link at `index` within the window.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the window.
    pub fn set_link(&mut self, index: usize, link: ChainLink) {
        self.links_mut()[index] = link;
    }

    /// Returns the number of links inside the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the first link of the window.
    #[must_use]
    pub fn first(&self) -> Option<&ChainLink> {
        self.links().first()
    }

    /// Returns the last link of the window.
    #[must_use]
    pub fn last(&self) -> Option<&ChainLink> {
        self.links().last()
    }

    /// Returns the candidate the chain starts from.
    #[must_use]
    pub fn start_candidate(&self) -> Option<Candidate> {
        self.first().map(ChainLink::candidate)
    }

    /// Returns the candidate the chain ends on.
    #[must_use]
    pub fn end_candidate(&self) -> Option<Candidate> {
        self.last().map(ChainLink::candidate)
    }

    /// Iterates the almost-structure indices referenced inside the window.
    pub fn almost_indices(&self) -> impl Iterator<Item = u16> + '_ {
        self.links().iter().filter_map(ChainLink::almost_index)
    }

    /// Drops the memoized length.
    pub fn invalidate_length(&self) {
        self.length.set(None);
    }

    /// Removes every link and resets the window, keeping the allocation.
    pub fn reset(&mut self) {
        self.links.clear();
        self.start = 0;
        self.end = 0;
        self.invalidate_length();
    }

    /// Returns the length of the chain without an almost-structure array.
    ///
    /// Each link counts 1; each ALS node adds
    /// [`NO_SIDE_ARRAY_ALS_PENALTY`].
    #[must_use]
    pub fn length(&self) -> u32 {
        self.memoized(ScoringMode::Plain, |_| NO_SIDE_ARRAY_ALS_PENALTY)
    }

    /// Returns the length of the chain, resolving ALS nodes against
    /// `almost_structures`.
    ///
    /// Each link counts 1; each ALS node adds the referenced structure's
    /// [`chain_penalty`](AlmostStructure::chain_penalty), or
    /// [`UNRESOLVED_ALS_PENALTY`] if its index is out of range.
    #[must_use]
    pub fn length_with<A>(&self, almost_structures: &[A]) -> u32
    where
        A: AlmostStructure,
    {
        self.memoized(ScoringMode::SideArray, |index| {
            almost_structures
                .get(usize::from(index))
                .map_or(UNRESOLVED_ALS_PENALTY, |structure| {
                    f64::from(structure.chain_penalty())
                })
        })
    }

    fn memoized<F>(&self, mode: ScoringMode, als_penalty: F) -> u32
    where
        F: Fn(u16) -> f64,
    {
        if let Some(cached) = self.length.get()
            && cached.mode == mode
        {
            return cached.value;
        }

        let mut total = 0.0;
        for link in self.links() {
            total += 1.0;
            if let ChainNode::Almost {
                kind: AlmostKind::Als,
                index,
                ..
            } = link.node()
            {
                total += als_penalty(*index);
            }
        }
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = total as u32;
        log::trace!("scored {} links as {value} ({mode:?})", self.len());
        self.length.set(Some(CachedLength { mode, value }));
        value
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.links() == other.links()
    }
}

impl Eq for Chain {}

impl FromIterator<ChainLink> for Chain {
    fn from_iter<I: IntoIterator<Item = ChainLink>>(iter: I) -> Self {
        let links: Vec<_> = iter.into_iter().collect();
        Self {
            end: links.len(),
            links,
            ..Self::default()
        }
    }
}

impl Extend<ChainLink> for Chain {
    fn extend<I: IntoIterator<Item = ChainLink>>(&mut self, iter: I) {
        for link in iter {
            self.push(link);
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a ChainLink;
    type IntoIter = slice::Iter<'a, ChainLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<PackedLink>> for Chain {
    type Error = DecodeError;

    fn try_from(words: Vec<PackedLink>) -> Result<Self, Self::Error> {
        Self::from_packed(&words)
    }
}

impl From<Chain> for Vec<PackedLink> {
    fn from(chain: Chain) -> Self {
        chain.to_packed()
    }
}
