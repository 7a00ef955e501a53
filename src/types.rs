use std::collections::BTreeMap;
use std::hash::Hash;

use crate::itemset::Itemset;

/// Anything that can be mined: totally ordered, hashable and shareable across the worker pool.
pub trait Item: Ord + Hash + Clone + Send + Sync {}

impl<X: Ord + Hash + Clone + Send + Sync> Item for X {}

pub type ItemsetLength = usize;
pub type SupportCount = usize;

/// Support counts of the frequent itemsets of a single level, in canonical order.
pub type FrequencyTable<I> = BTreeMap<Itemset<I>, SupportCount>;
