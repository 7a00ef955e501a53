use itertools::Itertools;

use crate::itemset::Itemset;

/// Join step of Apriori candidate generation.
///
/// Itemsets of size k-1 that share their first k-2 items are merged pairwise
/// into itemsets of size k. Once the input is in lexicographic order, itemsets
/// sharing a prefix sit next to each other, so only neighbours within a run
/// of equal prefixes are ever compared. Size-1 itemsets all share the empty
/// prefix, which makes every pair of items a candidate.
///
/// The output is duplicate-free and lexicographically ordered.
/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step<'a, I, It>(itemsets: It) -> Vec<Itemset<I>>
where
    I: Ord + Clone + 'a,
    It: IntoIterator<Item = &'a Itemset<I>>,
{
    let mut itemsets: Vec<&Itemset<I>> = itemsets.into_iter().collect();
    itemsets.sort_unstable();
    itemsets.dedup();

    let mut candidates = Vec::new();

    for run in itemsets.chunk_by(|a, b| a.prefix() == b.prefix()) {
        debug_assert!(run.iter().all(|itemset| itemset.len() == run[0].len()));

        for (a, b) in run.iter().tuple_combinations() {
            let (Some(a_last), Some(b_last)) = (a.last(), b.last()) else {
                continue;
            };

            let mut candidate = Vec::with_capacity(a.len() + 1);
            candidate.extend_from_slice(a.prefix());
            candidate.push(a_last.clone());
            candidate.push(b_last.clone());
            candidates.push(Itemset::from_sorted(candidate));
        }
    }

    candidates
}
