use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFrozenSet};

use crate::{
    CancellationToken, Error, FrequentItemsets, MiningConfig, MiningOutcome, Rule,
    TransactionDatabase,
};

#[pyclass(name = "Rule")]
#[derive(Clone)]
pub struct PyRule {
    #[pyo3(get)]
    antecedent: Vec<String>,
    #[pyo3(get)]
    consequent: Vec<String>,
    #[pyo3(get)]
    support: f64,
    #[pyo3(get)]
    confidence: f64,
    #[pyo3(get)]
    lift: f64,
}

#[pymethods]
impl PyRule {
    fn __repr__(&self) -> String {
        format!(
            "Rule({:?} => {:?}, support={}, confidence={}, lift={})",
            self.antecedent, self.consequent, self.support, self.confidence, self.lift
        )
    }
}

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pymodule]
fn apriori(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(apriori_py, m)?)?;
    m.add_class::<PyRule>()?;
    Ok(())
}

/// Apriori algorithm for association rules.
///
/// Returns `({k: {frozenset: count}}, [Rule])`.
#[pyfunction]
#[pyo3(
    name = "apriori",
    signature = (transactions, min_support, min_confidence, max_len = None)
)]
fn apriori_py(
    py: Python<'_>,
    transactions: Vec<Vec<String>>,
    min_support: f64,
    min_confidence: f64,
    max_len: Option<usize>,
) -> PyResult<(Py<PyDict>, Vec<PyRule>)> {
    let database = TransactionDatabase::from_transactions(transactions);
    let config = MiningConfig::new(min_support, min_confidence).with_max_len(max_len);

    let (outcome, rules) =
        py.allow_threads(|| crate::apriori(&database, &config, &CancellationToken::new()))?;

    let itemset_counts = match outcome {
        MiningOutcome::Frequent(frequent) => convert_itemset_counts(py, &frequent)?,
        MiningOutcome::NoFrequentItemsets => PyDict::new(py).into(),
    };
    Ok((itemset_counts, convert_rules(rules)))
}

fn convert_itemset_counts(
    py: Python<'_>,
    frequent: &FrequentItemsets<String>,
) -> PyResult<Py<PyDict>> {
    let levels = PyDict::new(py);
    for (size, itemset_counts) in frequent.levels() {
        let counts = PyDict::new(py);
        for (itemset, count) in itemset_counts {
            counts.set_item(PyFrozenSet::new(py, itemset.iter())?, count)?;
        }
        levels.set_item(size, counts)?;
    }
    Ok(levels.into())
}

fn convert_rules(rules: Vec<Rule<String>>) -> Vec<PyRule> {
    rules
        .into_iter()
        .map(|rule| PyRule {
            antecedent: rule.get_antecedent().items().to_vec(),
            consequent: rule.get_consequent().items().to_vec(),
            support: rule.support,
            confidence: rule.confidence,
            lift: rule.lift,
        })
        .collect()
}
