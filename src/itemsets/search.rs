use std::collections::{BTreeMap, BTreeSet, HashSet};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{combi::join_step, itemset::Itemset, types::Item};

/// Membership test over a collection of same-size itemsets.
pub trait ItemsetLookup<I> {
    fn contains_itemset(&self, items: &[I]) -> bool;
}

impl<I: Ord, V> ItemsetLookup<I> for BTreeMap<Itemset<I>, V> {
    fn contains_itemset(&self, items: &[I]) -> bool {
        self.contains_key(items)
    }
}

impl<I: Ord> ItemsetLookup<I> for BTreeSet<Itemset<I>> {
    fn contains_itemset(&self, items: &[I]) -> bool {
        self.contains(items)
    }
}

impl<I: Item> ItemsetLookup<I> for HashSet<Itemset<I>> {
    fn contains_itemset(&self, items: &[I]) -> bool {
        self.contains(items)
    }
}

/// Candidates of size k from the frequent itemsets of size k-1: join, then prune.
pub fn generate_candidates_from_prev<I, V>(prev: &BTreeMap<Itemset<I>, V>) -> Vec<Itemset<I>>
where
    I: Item,
    V: Sync,
{
    let joined = join_step(prev.keys());
    let joined_len = joined.len();
    let candidates = prune_step(prev, joined);

    debug!(
        joined = joined_len,
        pruned = joined_len - candidates.len(),
        candidates = candidates.len(),
        "generated candidates"
    );

    candidates
}

/// Drop every candidate with a (k-1)-subset missing from `prev`.
///
/// Any superset of an infrequent itemset is infrequent, so such candidates
/// cannot survive support counting. Order of the survivors is preserved.
pub fn prune_step<I, L>(prev: &L, candidates: Vec<Itemset<I>>) -> Vec<Itemset<I>>
where
    I: Item,
    L: ItemsetLookup<I> + Sync + ?Sized,
{
    candidates
        .into_par_iter()
        .filter(|candidate| has_frequent_subsets(prev, candidate))
        .collect()
}

fn has_frequent_subsets<I, L>(prev: &L, candidate: &Itemset<I>) -> bool
where
    I: Item,
    L: ItemsetLookup<I> + ?Sized,
{
    let items = candidate.items();
    let mut subset: Vec<I> = Vec::with_capacity(items.len().saturating_sub(1));

    for skip in 0..items.len() {
        subset.clear();
        subset.extend_from_slice(&items[..skip]);
        subset.extend_from_slice(&items[skip + 1..]);

        if !prev.contains_itemset(&subset) {
            trace!(missing_subset = ?skip, size = items.len(), "pruned candidate");
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::{btreemap, btreeset};

    fn itemset(items: Vec<u32>) -> Itemset<u32> {
        Itemset::new(items)
    }

    #[test]
    fn create_counts_from_prev_1_itemset() {
        let itemset_counts = btreemap! {
            itemset(vec![10]) => 0,
            itemset(vec![13]) => 0,
            itemset(vec![14]) => 0,
        };
        let candidates = generate_candidates_from_prev(&itemset_counts);

        let expected = vec![
            itemset(vec![10, 13]),
            itemset(vec![10, 14]),
            itemset(vec![13, 14]),
        ];

        assert_eq!(candidates, expected);
    }

    #[test]
    fn create_counts_from_prev_2_itemset() {
        let itemset_counts = btreemap! {
            itemset(vec![10, 11]) => 1,
            itemset(vec![11, 13]) => 2,
            itemset(vec![13, 14]) => 1,
        };
        let candidates = generate_candidates_from_prev(&itemset_counts);

        assert!(candidates.is_empty());
    }

    #[test]
    fn join_output_with_missing_subset_is_pruned() {
        // {c, d} is absent, so {b, c, d} cannot be frequent
        let prev = btreemap! {
            Itemset::new(vec!['a', 'b']) => 2,
            Itemset::new(vec!['b', 'c']) => 2,
            Itemset::new(vec!['a', 'd']) => 2,
            Itemset::new(vec!['b', 'd']) => 2,
        };
        let candidates = generate_candidates_from_prev(&prev);

        assert_eq!(candidates, vec![Itemset::new(vec!['a', 'b', 'd'])]);
    }

    #[test]
    fn prune_keeps_candidates_with_all_subsets_present() {
        let prev = btreeset! {
            itemset(vec![1, 2, 3]),
            itemset(vec![1, 2, 4]),
            itemset(vec![1, 3, 4]),
            itemset(vec![2, 3, 4]),
            itemset(vec![1, 3, 5]),
        };
        let candidates = vec![itemset(vec![1, 2, 3, 4]), itemset(vec![1, 3, 4, 5])];

        let survivors = prune_step(&prev, candidates);

        assert_eq!(survivors, vec![itemset(vec![1, 2, 3, 4])]);
    }

    #[test]
    fn prune_against_hash_set() {
        let prev: HashSet<_> = vec![itemset(vec![1]), itemset(vec![2])].into_iter().collect();
        let survivors = prune_step(&prev, vec![itemset(vec![1, 2]), itemset(vec![1, 3])]);
        assert_eq!(survivors, vec![itemset(vec![1, 2])]);
    }
}
