//! Frequent itemset mining and association rules with the Apriori algorithm.
//!
//! The database is scanned once to find the frequent items and the transactions
//! each of them occurs in. Larger itemsets are then found level by level: the
//! frequent itemsets of size k-1 are joined into candidates of size k, candidates
//! with an infrequent subset are pruned, and the rest are counted by intersecting
//! the transaction sets of their items.
//!
//! ```
//! use apriori::{apriori, CancellationToken, MiningConfig, TransactionDatabase};
//!
//! let database = TransactionDatabase::from_transactions(vec![
//!     vec!["a", "b"],
//!     vec!["a", "b", "c"],
//!     vec!["a"],
//!     vec!["b", "c"],
//! ]);
//! let config = MiningConfig::new(0.5, 0.6);
//! let (outcome, rules) = apriori(&database, &config, &CancellationToken::new()).unwrap();
//!
//! let frequent = outcome.frequent_itemsets().unwrap();
//! assert_eq!(frequent.support_count(&["a", "b"]), Some(2));
//! assert!(rules.iter().any(|rule| rule.to_string() == "{a} => {b}"));
//! ```

mod cancel;
pub mod combi;
mod config;
mod database;
mod error;
pub mod itemset;
pub mod itemsets;
pub mod rules;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;

pub use cancel::CancellationToken;
pub use config::MiningConfig;
pub use database::TransactionDatabase;
pub use error::{Error, Result};
pub use itemset::Itemset;
pub use itemsets::{
    count::generate_frequent_itemsets, index::SupportIndex, index::TidSet, FrequentItemsets,
    MiningOutcome,
};
pub use rules::{generate_rules, Rule};
pub use types::{FrequencyTable, Item, ItemsetLength, SupportCount};

/// Apriori algorithm for association rules.
///
/// Mines the frequent itemsets of `database` and derives the rules meeting
/// `config.min_confidence` from them.
pub fn apriori<T, I>(
    database: &TransactionDatabase<T, I>,
    config: &MiningConfig,
    cancel: &CancellationToken,
) -> Result<(MiningOutcome<I>, Vec<Rule<I>>)>
where
    T: Ord + Sync,
    I: Item,
{
    let outcome = generate_frequent_itemsets(database, config, cancel)?;
    let rules = match outcome.frequent_itemsets() {
        Some(frequent) => generate_rules(config.min_confidence, frequent)?,
        None => vec![],
    };
    Ok((outcome, rules))
}
