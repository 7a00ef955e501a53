pub mod count;
pub mod index;
pub mod search;

use std::collections::BTreeMap;

use crate::{
    itemset::Itemset,
    types::{FrequencyTable, ItemsetLength, SupportCount},
};

pub(crate) fn meets_support(count: SupportCount, total: usize, min_support: f64) -> bool {
    count as f64 / total as f64 >= min_support
}

/// Frequent itemsets of every non-empty level, keyed by itemset size.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemsets<I> {
    levels: BTreeMap<ItemsetLength, FrequencyTable<I>>,
    total_transactions: usize,
}

impl<I: Ord> FrequentItemsets<I> {
    pub(crate) fn new(total_transactions: usize) -> Self {
        Self {
            levels: BTreeMap::new(),
            total_transactions,
        }
    }

    pub(crate) fn push_level(&mut self, table: FrequencyTable<I>) {
        let size = self.levels.len() + 1;
        debug_assert!(table.keys().all(|itemset| itemset.len() == size));
        self.levels.insert(size, table);
    }

    pub fn level(&self, size: ItemsetLength) -> Option<&FrequencyTable<I>> {
        self.levels.get(&size)
    }

    pub fn levels(&self) -> impl Iterator<Item = (ItemsetLength, &FrequencyTable<I>)> + '_ {
        self.levels.iter().map(|(&size, table)| (size, table))
    }

    pub fn into_levels(self) -> BTreeMap<ItemsetLength, FrequencyTable<I>> {
        self.levels
    }

    /// Size of the largest frequent itemset.
    pub fn max_level(&self) -> ItemsetLength {
        self.levels.len()
    }

    /// Number of frequent itemsets across all levels.
    pub fn len(&self) -> usize {
        self.levels.values().map(|table| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn total_transactions(&self) -> usize {
        self.total_transactions
    }

    /// All frequent itemsets, smallest level first.
    pub fn iter(&self) -> impl Iterator<Item = (&Itemset<I>, SupportCount)> + '_ {
        self.levels
            .values()
            .flat_map(|table| table.iter().map(|(itemset, &count)| (itemset, count)))
    }

    /// Number of transactions containing `items`, if they form a frequent itemset.
    /// `items` may be in any order and may repeat.
    pub fn support_count(&self, items: &[I]) -> Option<SupportCount>
    where
        I: Clone,
    {
        if items.windows(2).all(|pair| pair[0] < pair[1]) {
            return self.levels.get(&items.len())?.get(items).copied();
        }
        let itemset = Itemset::new(items.iter().cloned());
        self.levels.get(&itemset.len())?.get(&itemset).copied()
    }

    /// Fraction of transactions containing `items`, if they form a frequent itemset.
    pub fn support(&self, items: &[I]) -> Option<f64>
    where
        I: Clone,
    {
        self.support_count(items)
            .map(|count| count as f64 / self.total_transactions as f64)
    }
}

/// Result of a mining run.
#[derive(Debug, Clone, PartialEq)]
pub enum MiningOutcome<I> {
    Frequent(FrequentItemsets<I>),
    /// No single item met the support threshold.
    NoFrequentItemsets,
}

impl<I> MiningOutcome<I> {
    pub fn frequent_itemsets(&self) -> Option<&FrequentItemsets<I>> {
        match self {
            MiningOutcome::Frequent(frequent) => Some(frequent),
            MiningOutcome::NoFrequentItemsets => None,
        }
    }

    pub fn into_frequent_itemsets(self) -> Option<FrequentItemsets<I>> {
        match self {
            MiningOutcome::Frequent(frequent) => Some(frequent),
            MiningOutcome::NoFrequentItemsets => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MiningOutcome::NoFrequentItemsets)
    }

    /// Whether any frequent itemset has two or more items, i.e. whether rules
    /// can be derived at all.
    pub fn has_multi_item_patterns(&self) -> bool {
        match self {
            MiningOutcome::Frequent(frequent) => frequent.levels.len() >= 2,
            MiningOutcome::NoFrequentItemsets => false,
        }
    }
}
