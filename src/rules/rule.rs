use std::fmt::{Display, Formatter, Result};

use crate::{itemset::Itemset, itemsets::FrequentItemsets, types::Item};

/// An association rule `antecedent => consequent` over disjoint, non-empty itemsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<I> {
    antecedent: Itemset<I>,
    consequent: Itemset<I>,
    /// Fraction of transactions containing both sides.
    pub support: f64,
    /// support(antecedent ∪ consequent) / support(antecedent)
    pub confidence: f64,
    /// confidence / support(consequent)
    pub lift: f64,
}

impl<I: Item> Rule<I> {
    /// Score the rule `pattern \ consequent => consequent`.
    ///
    /// `None` when either side would be empty, or when `frequent` lacks one of
    /// the counts involved.
    pub fn from_split(
        pattern: &Itemset<I>,
        consequent: Itemset<I>,
        frequent: &FrequentItemsets<I>,
    ) -> Option<Self> {
        let antecedent = pattern.difference(&consequent);
        if antecedent.is_empty() || consequent.is_empty() {
            return None;
        }

        let union_support_count = frequent.support_count(pattern.items())? as f64;
        let antecedent_support_count = frequent.support_count(antecedent.items())? as f64;
        let consequent_support_count = frequent.support_count(consequent.items())? as f64;
        let total = frequent.total_transactions() as f64;

        let confidence = union_support_count / antecedent_support_count;
        Some(Self {
            antecedent,
            consequent,
            support: union_support_count / total,
            confidence,
            lift: confidence * total / consequent_support_count,
        })
    }

    pub fn get_antecedent(&self) -> &Itemset<I> {
        &self.antecedent
    }

    pub fn get_consequent(&self) -> &Itemset<I> {
        &self.consequent
    }

    /// Both sides of the rule together.
    pub fn pattern(&self) -> Itemset<I> {
        self.antecedent
            .iter()
            .chain(self.consequent.iter())
            .cloned()
            .collect()
    }
}

impl<I: Display> Display for Rule<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} => {}", self.antecedent, self.consequent)
    }
}
