use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    cancel::CancellationToken,
    config::MiningConfig,
    database::TransactionDatabase,
    error::Result,
    itemset::Itemset,
    itemsets::{
        index::{SupportIndex, TidSet},
        meets_support,
        search::generate_candidates_from_prev,
        FrequentItemsets, MiningOutcome,
    },
    types::{FrequencyTable, Item},
};

/// Generate frequent itemsets from a database of transactions.
///
/// Level 1 comes from a single scan of the database. Every later level is
/// derived from the previous one by candidate generation and pruning, and
/// counted by intersecting the transaction sets of the candidate's items.
/// Mining stops at the first empty level, or after `config.max_len`.
pub fn generate_frequent_itemsets<T, I>(
    database: &TransactionDatabase<T, I>,
    config: &MiningConfig,
    cancel: &CancellationToken,
) -> Result<MiningOutcome<I>>
where
    T: Ord + Sync,
    I: Item,
{
    mine_levels(database, config, cancel, |_| {})
}

/// Level driver behind [`generate_frequent_itemsets`]. `on_level` sees the
/// accumulated result after each level is stored.
pub(crate) fn mine_levels<T, I, F>(
    database: &TransactionDatabase<T, I>,
    config: &MiningConfig,
    cancel: &CancellationToken,
    mut on_level: F,
) -> Result<MiningOutcome<I>>
where
    T: Ord + Sync,
    I: Item,
    F: FnMut(&FrequentItemsets<I>),
{
    config.validate()?;
    cancel.check(1)?;

    info!(
        transactions = database.len(),
        min_support = config.min_support,
        max_len = ?config.max_len,
        "mining frequent itemsets"
    );

    let (frequent_1_itemset_counts, index) = SupportIndex::build(database, config.min_support)?;
    if frequent_1_itemset_counts.is_empty() {
        info!("no item meets the support threshold");
        return Ok(MiningOutcome::NoFrequentItemsets);
    }

    let session = MiningSession {
        index,
        min_support: config.min_support,
    };
    let mut all_frequent_itemsets = FrequentItemsets::new(session.index.total_transactions());
    all_frequent_itemsets.push_level(frequent_1_itemset_counts);
    on_level(&all_frequent_itemsets);

    while config
        .max_len
        .map_or(true, |max_len| all_frequent_itemsets.max_level() < max_len)
    {
        let size = all_frequent_itemsets.max_level() + 1;
        cancel.check(size)?;

        let Some(prev) = all_frequent_itemsets.level(size - 1) else {
            break;
        };
        let frequent_itemset_counts = session.next_level(prev);
        debug!(
            level = size,
            frequent = frequent_itemset_counts.len(),
            "counted level"
        );

        if frequent_itemset_counts.is_empty() {
            break;
        }
        all_frequent_itemsets.push_level(frequent_itemset_counts);
        on_level(&all_frequent_itemsets);
    }

    info!(
        levels = all_frequent_itemsets.max_level(),
        itemsets = all_frequent_itemsets.len(),
        "mining finished"
    );

    Ok(MiningOutcome::Frequent(all_frequent_itemsets))
}

/// State that lives for exactly one mining run.
struct MiningSession<'db, T, I> {
    index: SupportIndex<'db, T, I>,
    min_support: f64,
}

impl<'db, T: Sync, I: Item> MiningSession<'db, T, I> {
    fn next_level(&self, prev: &FrequencyTable<I>) -> FrequencyTable<I> {
        let candidates = generate_candidates_from_prev(prev);
        generate_frequent_k_itemset_counts(candidates, &self.index, self.min_support)
    }
}

/// Count every candidate independently and keep the frequent ones.
fn generate_frequent_k_itemset_counts<T: Sync, I: Item>(
    candidates: Vec<Itemset<I>>,
    index: &SupportIndex<'_, T, I>,
    min_support: f64,
) -> FrequencyTable<I> {
    candidates
        .into_par_iter()
        .filter_map(|candidate| {
            let tids = count_support(&candidate, index, min_support)?;
            Some((candidate, tids.len()))
        })
        .collect()
}

/// Transactions containing every item of `candidate`, if there are enough of them
/// to meet `min_support`.
///
/// The items' transaction sets are intersected smallest first. The running
/// intersection only shrinks, so counting stops as soon as it drops below the
/// threshold.
pub fn count_support<T, I: Item>(
    candidate: &Itemset<I>,
    index: &SupportIndex<'_, T, I>,
    min_support: f64,
) -> Option<TidSet> {
    let total = index.total_transactions();

    let mut tid_sets = Vec::with_capacity(candidate.len());
    for item in candidate {
        tid_sets.push(index.tid_set(item)?);
    }
    tid_sets.sort_unstable_by_key(|tids| tids.len());

    let (smallest, rest) = tid_sets.split_first()?;
    let mut supporting = (*smallest).clone();
    for tids in rest {
        if !meets_support(supporting.len(), total, min_support) {
            return None;
        }
        supporting.intersect_with(tids);
    }

    if meets_support(supporting.len(), total, min_support) {
        Some(supporting)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use maplit::btreemap;

    const A: &str = "Item A";
    const B: &str = "Item B";
    const C: &str = "Item C";
    const D: &str = "Item D";

    macro_rules! itemset {
        ($($x:expr),*) => {
            Itemset::new(vec![$($x),*])
        };
    }

    fn mine(
        transactions: Vec<Vec<&'static str>>,
        min_support: f64,
        max_len: Option<usize>,
    ) -> MiningOutcome<&'static str> {
        let database = TransactionDatabase::from_transactions(transactions);
        let config = MiningConfig::new(min_support, 0.5).with_max_len(max_len);
        generate_frequent_itemsets(&database, &config, &CancellationToken::new()).unwrap()
    }

    fn levels(outcome: MiningOutcome<&'static str>) -> Vec<FrequencyTable<&'static str>> {
        outcome
            .into_frequent_itemsets()
            .unwrap()
            .into_levels()
            .into_values()
            .collect()
    }

    #[test]
    fn count_support_intersects_transaction_sets() {
        let database = TransactionDatabase::from_transactions(vec![
            vec![10, 11],
            vec![10, 15],
            vec![10, 13],
            vec![10, 13],
            vec![10, 13],
            vec![11, 13],
        ]);
        let (_, index) = SupportIndex::build(&database, 0.1).unwrap();

        let tids = count_support(&itemset![10, 13], &index, 0.5).unwrap();
        assert_eq!(tids.len(), 3);
        assert_eq!(
            index.transaction_ids(&tids).copied().collect::<Vec<_>>(),
            vec![2, 3, 4]
        );

        assert!(count_support(&itemset![10, 11], &index, 0.5).is_none());
        assert!(count_support(&itemset![11, 15], &index, 0.1).is_none());
        assert_eq!(count_support(&itemset![10, 11], &index, 0.1).unwrap().len(), 1);
    }

    #[test]
    fn count_support_stops_once_below_threshold() {
        let database = TransactionDatabase::from_transactions(vec![
            vec![1, 2, 3],
            vec![1, 3],
            vec![1, 3],
            vec![2, 3],
            vec![2, 3],
            vec![2, 3],
        ]);
        let (_, index) = SupportIndex::build(&database, 0.5).unwrap();

        // {1} ∩ {2} leaves one transaction, so {3} is never reached
        assert!(count_support(&itemset![1, 2, 3], &index, 0.5).is_none());
        assert_eq!(count_support(&itemset![1, 2, 3], &index, 0.1).unwrap().len(), 1);

        let tids = count_support(&itemset![2, 3], &index, 0.5).unwrap();
        assert_eq!(
            index.transaction_ids(&tids).copied().collect::<Vec<_>>(),
            vec![0, 3, 4, 5]
        );
        assert_eq!(count_support(&itemset![1, 3], &index, 0.5).unwrap().len(), 3);
    }

    #[test]
    fn count_support_of_unindexed_item() {
        let database = TransactionDatabase::from_transactions(vec![vec![10, 11], vec![10, 12]]);
        let (_, index) = SupportIndex::build(&database, 1.0).unwrap();

        assert_eq!(count_support(&itemset![10], &index, 1.0).unwrap().len(), 2);
        assert!(count_support(&itemset![10, 11], &index, 0.1).is_none());
    }

    #[test]
    fn test_generate_frequent_itemsets_001_minsupport() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C], vec![B, D]];
        let frequent_itemsets = levels(mine(transactions, 0.01, None));

        let expected = vec![
            btreemap! {
                itemset![A] => 3,
                itemset![B] => 3,
                itemset![C] => 2,
                itemset![D] => 1,
            },
            btreemap! {
                itemset![A, B] => 2,
                itemset![A, C] => 2,
                itemset![B, C] => 1,
                itemset![B, D] => 1,
            },
            btreemap! {
                itemset![A, B, C] => 1,
            },
        ];

        assert_eq!(frequent_itemsets, expected);
    }

    #[test]
    fn test_generate_frequent_itemsets_05_minsupport() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C], vec![B, D]];
        let frequent_itemsets = levels(mine(transactions, 0.5, Some(3)));

        let expected = vec![
            btreemap! {
                itemset![A] => 3,
                itemset![B] => 3,
                itemset![C] => 2,
            },
            btreemap! {
                itemset![A, B] => 2,
                itemset![A, C] => 2,
            },
        ];

        assert_eq!(frequent_itemsets, expected);
    }

    #[test]
    fn test_generate_frequent_itemsets_05_minsupport_large_k() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C], vec![B, C]];
        let frequent_itemsets = levels(mine(transactions, 0.5, Some(5)));

        let expected = vec![
            btreemap! {
                itemset![A] => 3,
                itemset![B] => 3,
                itemset![C] => 3,
            },
            btreemap! {
                itemset![A, B] => 2,
                itemset![A, C] => 2,
                itemset![B, C] => 2,
            },
        ];

        assert_eq!(frequent_itemsets, expected);
    }

    #[test]
    fn max_len_caps_levels() {
        let transactions = vec![vec![A, B, C], vec![A, B, C]];
        let frequent_itemsets = levels(mine(transactions, 0.5, Some(2)));
        assert_eq!(frequent_itemsets.len(), 2);
        assert_eq!(frequent_itemsets[1].len(), 3);
    }

    #[test]
    fn nothing_frequent() {
        let outcome = mine(vec![vec![A], vec![B]], 1.0, None);
        assert_eq!(outcome, MiningOutcome::NoFrequentItemsets);
        assert!(outcome.is_empty());
    }

    #[test]
    fn cancelled_run_stops_before_counting() {
        let database = TransactionDatabase::from_transactions(vec![vec![A, B]]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = generate_frequent_itemsets(&database, &MiningConfig::default(), &cancel);
        assert_eq!(result, Err(Error::Cancelled { level: 1 }));
    }

    #[test]
    fn cancelled_between_levels() {
        let database = TransactionDatabase::from_transactions(vec![vec![A, B, C], vec![A, B, C]]);
        let config = MiningConfig::new(0.5, 0.5);

        let cancel = CancellationToken::new();
        let result = mine_levels(&database, &config, &cancel, |frequent| {
            if frequent.max_level() == 1 {
                cancel.cancel();
            }
        });
        assert_eq!(result, Err(Error::Cancelled { level: 2 }));

        let cancel = CancellationToken::new();
        let mut seen = Vec::new();
        let result = mine_levels(&database, &config, &cancel, |frequent| {
            seen.push(frequent.max_level());
            if frequent.max_level() == 2 {
                cancel.cancel();
            }
        });
        assert_eq!(result, Err(Error::Cancelled { level: 3 }));
        assert_eq!(seen, vec![1, 2]);

        let mut seen = Vec::new();
        let outcome = mine_levels(&database, &config, &CancellationToken::new(), |frequent| {
            seen.push(frequent.max_level())
        })
        .unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(outcome.frequent_itemsets().unwrap().max_level(), 3);
    }

    #[test]
    fn invalid_config_fails_before_mining() {
        let database = TransactionDatabase::from_transactions(vec![vec![A, B]]);
        let config = MiningConfig::new(0.5, 1.5);
        let result = generate_frequent_itemsets(&database, &config, &CancellationToken::new());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
