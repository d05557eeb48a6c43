//! Almost-structure index compaction.
//!
//! A search pass collects every almost-structure it tries into one large
//! side array. Once a step is chosen, only the structures its chains
//! actually reference need to be kept with it.

use crate::{Chain, LinkError};

/// Keeps only the almost-structures referenced by `chains` and renumbers the
/// links to match.
///
/// Structures are kept in the order of their first reference, scanning the
/// windows of `chains` front to back. Each kept structure is passed through
/// `materialize` once, and the results are returned in their new index
/// order. Every chain's memoized length is dropped.
///
/// Nothing is modified if an error is returned.
///
/// # Errors
///
/// Returns [`LinkError::MissingAlmostStructure`] if a link refers to an index
/// outside `structures`.
///
/// # Examples
///
/// ```
/// use deduce_chain::{AlmostKind, Chain, ChainLink, compact_almost_structures};
///
/// let mut chains = [[
///     ChainLink::normal(0, 3, true),
///     ChainLink::almost(AlmostKind::Als, 10, 4, 3, false),
///     ChainLink::almost(AlmostKind::Als, 20, 2, 3, true),
/// ]
/// .into_iter()
/// .collect::<Chain>()];
/// let names = ["a", "b", "c", "d", "e"];
///
/// let kept = compact_almost_structures(&mut chains, &names, |name| name.to_uppercase())?;
/// assert_eq!(kept, ["E", "C"]);
/// assert_eq!(chains[0].almost_indices().collect::<Vec<_>>(), [0, 1]);
/// # Ok::<(), deduce_chain::LinkError>(())
/// ```
pub fn compact_almost_structures<S, M, F>(
    chains: &mut [Chain],
    structures: &[S],
    mut materialize: F,
) -> Result<Vec<M>, LinkError>
where
    F: FnMut(&S) -> M,
{
    let mut remap: Vec<Option<u16>> = vec![None; structures.len()];
    let mut kept = Vec::new();
    for index in chains.iter().flat_map(Chain::almost_indices) {
        let slot = remap
            .get_mut(usize::from(index))
            .ok_or(LinkError::MissingAlmostStructure {
                index,
                available: structures.len(),
            })?;
        if slot.is_none() {
            // distinct u16 indices, so the count always fits
            *slot = Some(u16::try_from(kept.len()).unwrap_or(u16::MAX));
            kept.push(usize::from(index));
        }
    }

    for chain in &mut *chains {
        for link in chain.links_mut() {
            if let Some(index) = link.almost_index()
                && let Some(new_index) = remap[usize::from(index)]
            {
                link.set_almost_index(new_index);
            }
        }
    }

    log::debug!(
        "kept {} of {} almost-structures across {} chains",
        kept.len(),
        structures.len(),
        chains.len()
    );
    Ok(kept
        .into_iter()
        .map(|index| materialize(&structures[index]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlmostKind, AlmostStructure, AlsMaterialization, ChainLink};

    struct Found {
        cells: Vec<u8>,
    }

    fn materialize(found: &Found) -> AlsMaterialization {
        let mut als = AlsMaterialization::new();
        for &cell in &found.cells {
            als.add_index(cell);
        }
        als
    }

    fn structures(count: u8) -> Vec<Found> {
        (0..count)
            .map(|i| Found {
                cells: (0..=i).collect(),
            })
            .collect()
    }

    fn als(cell: u8, index: u16) -> ChainLink {
        ChainLink::almost(AlmostKind::Als, cell, index, 1, true)
    }

    #[test]
    fn test_keeps_first_reference_order_across_chains() {
        let mut chains = vec![
            [als(0, 7), ChainLink::normal(1, 1, false), als(2, 3)]
                .into_iter()
                .collect::<Chain>(),
            [als(3, 3), als(4, 5), als(5, 7)].into_iter().collect(),
        ];
        let found = structures(10);
        let kept = compact_almost_structures(&mut chains, &found, materialize).unwrap();

        assert_eq!(
            kept.iter().map(AlmostStructure::cell_count).collect::<Vec<_>>(),
            vec![8, 4, 6]
        );
        assert_eq!(chains[0].almost_indices().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(chains[1].almost_indices().collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(chains[0].links()[1], ChainLink::normal(1, 1, false));
    }

    #[test]
    fn test_lengths_are_rescored() {
        let mut chains = vec![[als(0, 9)].into_iter().collect::<Chain>()];
        let found = structures(10);
        assert_eq!(chains[0].length_with(&[AlsMaterialization::new()]), 1 + 2);

        let kept = compact_almost_structures(&mut chains, &found, materialize).unwrap();
        assert_eq!(kept[0].cell_count(), 10);
        assert_eq!(chains[0].length_with(&kept), 1 + 7);
    }

    #[test]
    fn test_missing_structure_leaves_chains_untouched() {
        let mut chains = vec![[als(0, 1), als(1, 4)].into_iter().collect::<Chain>()];
        let found = structures(3);
        let err = compact_almost_structures(&mut chains, &found, materialize).unwrap_err();
        assert_eq!(
            err,
            LinkError::MissingAlmostStructure {
                index: 4,
                available: 3
            }
        );
        assert_eq!(chains[0].almost_indices().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_no_references_keeps_nothing() {
        let mut chains = vec![[ChainLink::normal(0, 1, true)].into_iter().collect::<Chain>()];
        let kept = compact_almost_structures(&mut chains, &structures(4), materialize).unwrap();
        assert!(kept.is_empty());
    }
}
