use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::debug;

use crate::{
    combi::join_step,
    config::validate_fraction,
    error::Result,
    itemset::Itemset,
    itemsets::{search::prune_step, FrequentItemsets},
    rules::rule::Rule,
    types::Item,
};

/// Generate every rule with confidence of at least `min_conf` from the frequent
/// itemsets of size two and up.
///
/// Rules come out grouped by pattern, in level order and then itemset order.
pub fn generate_rules<I: Item>(
    min_conf: f64,
    frequent: &FrequentItemsets<I>,
) -> Result<Vec<Rule<I>>> {
    validate_fraction("min_confidence", min_conf)?;

    let patterns: Vec<&Itemset<I>> = frequent
        .levels()
        .filter(|&(size, _)| size > 1)
        .flat_map(|(_, itemset_counts)| itemset_counts.keys())
        .collect();

    let rules: Vec<Rule<I>> = patterns
        .par_iter()
        .flat_map_iter(|pattern| rules_for_pattern(pattern, min_conf, frequent))
        .collect();

    debug!(patterns = patterns.len(), rules = rules.len(), "generated rules");

    Ok(rules)
}

/// Given a pattern, find the rules over it that meet `min_conf`.
///
/// Confidence over a fixed pattern can only fall as items move from the
/// antecedent to the consequent. Consequents are therefore grown one item at a
/// time with the same join and prune steps used for itemsets, and a consequent
/// is only extended while every smaller consequent inside it passed.
pub fn rules_for_pattern<I: Item>(
    pattern: &Itemset<I>,
    min_conf: f64,
    frequent: &FrequentItemsets<I>,
) -> Vec<Rule<I>> {
    let mut final_rules = vec![];
    let mut consequents: Vec<Itemset<I>> =
        pattern.iter().cloned().map(Itemset::singleton).collect();

    while consequents
        .first()
        .map_or(false, |consequent| consequent.len() < pattern.len())
    {
        let mut confident = BTreeSet::new();

        for consequent in consequents {
            let Some(rule) = Rule::from_split(pattern, consequent, frequent) else {
                continue;
            };
            if rule.confidence >= min_conf {
                confident.insert(rule.get_consequent().clone());
                final_rules.push(rule);
            }
        }

        consequents = prune_step(&confident, join_step(&confident));
    }

    final_rules
}
