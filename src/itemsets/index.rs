use std::collections::HashMap;

use bitvec::prelude::*;
use itertools::Either;
use tracing::debug;

use crate::{
    config::validate_fraction,
    database::TransactionDatabase,
    error::{Error, Result},
    itemset::Itemset,
    itemsets::meets_support,
    types::{FrequencyTable, Item, SupportCount},
};

/// Set of transactions, held as positions into the database.
///
/// Sparse sets are a sorted position list; sets covering at least one in every
/// `usize::BITS` transactions are a bitmap, which is then no larger than the list.
/// Either way a set costs space proportional to its own size.
#[derive(Debug, Clone)]
pub struct TidSet {
    repr: Repr,
    len: usize,
}

#[derive(Debug, Clone)]
enum Repr {
    Sparse(Vec<usize>),
    Dense(BitVec),
}

impl TidSet {
    /// `positions` must be strictly ascending and below `total`.
    fn from_positions(positions: Vec<usize>, total: usize) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        let len = positions.len();

        let repr = if len * usize::BITS as usize >= total {
            let mut bits = bitvec![0; total];
            for position in positions {
                bits.set(position, true);
            }
            Repr::Dense(bits)
        } else {
            Repr::Sparse(positions)
        };

        Self { repr, len }
    }

    /// Number of transactions in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_dense(&self) -> bool {
        matches!(self.repr, Repr::Dense(_))
    }

    pub fn contains(&self, position: usize) -> bool {
        match &self.repr {
            Repr::Sparse(positions) => positions.binary_search(&position).is_ok(),
            Repr::Dense(bits) => bits.get(position).map_or(false, |bit| *bit),
        }
    }

    /// Keep only the transactions also present in `other`.
    ///
    /// Work is bounded by the smaller of the two sets: a sparse side is walked
    /// and probed against the other, and two bitmaps are only ANDed when both
    /// are dense.
    pub fn intersect_with(&mut self, other: &TidSet) {
        let common = match (&mut self.repr, &other.repr) {
            (Repr::Dense(bits), Repr::Dense(other_bits)) => {
                debug_assert_eq!(bits.len(), other_bits.len());
                *bits &= other_bits.as_bitslice();
                self.len = bits.count_ones();
                return;
            }
            (Repr::Sparse(positions), Repr::Sparse(other_positions)) => {
                if positions.len() <= other_positions.len() {
                    intersect_sorted(positions, other_positions)
                } else {
                    intersect_sorted(other_positions, positions)
                }
            }
            (Repr::Sparse(positions), Repr::Dense(other_bits)) => {
                filter_by_bits(positions, other_bits)
            }
            (Repr::Dense(bits), Repr::Sparse(other_positions)) => {
                filter_by_bits(other_positions, bits)
            }
        };

        self.len = common.len();
        self.repr = Repr::Sparse(common);
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        match &self.repr {
            Repr::Sparse(positions) => Either::Left(positions.iter().copied()),
            Repr::Dense(bits) => Either::Right(bits.iter_ones()),
        }
    }
}

fn filter_by_bits(positions: &[usize], bits: &BitSlice) -> Vec<usize> {
    positions
        .iter()
        .copied()
        .filter(|&position| bits.get(position).map_or(false, |bit| *bit))
        .collect()
}

/// Intersect two ascending lists by binary search into the longer one, `small` being the shorter.
fn intersect_sorted(small: &[usize], large: &[usize]) -> Vec<usize> {
    let mut common = Vec::with_capacity(small.len());
    let mut rest = large;

    for &position in small {
        if rest.is_empty() {
            break;
        }
        match rest.binary_search(&position) {
            Ok(found) => {
                common.push(position);
                rest = &rest[found + 1..];
            }
            Err(insert_at) => rest = &rest[insert_at..],
        }
    }

    common
}

/// Inverted index from each frequent item to the transactions containing it.
///
/// Built once per run from the first and only scan of the database. Items that
/// miss the support threshold are not kept.
#[derive(Debug)]
pub struct SupportIndex<'db, T, I> {
    transaction_ids: Vec<&'db T>,
    tid_sets: HashMap<I, TidSet>,
}

impl<'db, T, I: Item> SupportIndex<'db, T, I> {
    /// Count every item, keep the frequent ones, and index where they occur.
    ///
    /// Returns the level-1 frequency table along with the index.
    pub fn build(
        database: &'db TransactionDatabase<T, I>,
        min_support: f64,
    ) -> Result<(FrequencyTable<I>, Self)>
    where
        T: Ord,
    {
        validate_fraction("min_support", min_support)?;
        if database.is_empty() {
            return Err(Error::InvalidInput("transaction database is empty".into()));
        }

        let total = database.len();
        let mut transaction_ids = Vec::with_capacity(total);
        let mut occurrences: HashMap<&I, Vec<usize>> = HashMap::new();

        for (position, (id, items)) in database.iter().enumerate() {
            transaction_ids.push(id);
            for item in items {
                let positions = occurrences.entry(item).or_default();
                // repeated items within one transaction count once
                if positions.last() != Some(&position) {
                    positions.push(position);
                }
            }
        }

        let distinct = occurrences.len();
        occurrences.retain(|_, positions| meets_support(positions.len(), total, min_support));

        debug!(
            transactions = total,
            distinct_items = distinct,
            frequent_items = occurrences.len(),
            "built support index"
        );

        let mut frequent: FrequencyTable<I> = FrequencyTable::new();
        let mut tid_sets = HashMap::with_capacity(occurrences.len());
        for (item, positions) in occurrences {
            frequent.insert(Itemset::singleton(item.clone()), positions.len());
            tid_sets.insert(item.clone(), TidSet::from_positions(positions, total));
        }

        Ok((
            frequent,
            Self {
                transaction_ids,
                tid_sets,
            },
        ))
    }

    pub fn tid_set(&self, item: &I) -> Option<&TidSet> {
        self.tid_sets.get(item)
    }

    pub fn support_count(&self, item: &I) -> Option<SupportCount> {
        self.tid_sets.get(item).map(TidSet::len)
    }

    pub fn total_transactions(&self) -> usize {
        self.transaction_ids.len()
    }

    /// Number of frequent items held in the index.
    pub fn len(&self) -> usize {
        self.tid_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tid_sets.is_empty()
    }

    /// Resolve a set back to the caller's transaction ids, in ascending id order.
    pub fn transaction_ids<'s>(
        &'s self,
        tids: &'s TidSet,
    ) -> impl Iterator<Item = &'db T> + 's {
        tids.positions().map(move |position| self.transaction_ids[position])
    }
}
