use std::collections::BTreeMap;

/// Transactions keyed by their identifier.
///
/// Items are kept as given. Repeated items inside one transaction count once
/// when the support index is built.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDatabase<T, I> {
    transactions: BTreeMap<T, Vec<I>>,
}

impl<T: Ord, I> Default for TransactionDatabase<T, I> {
    fn default() -> Self {
        Self {
            transactions: BTreeMap::new(),
        }
    }
}

impl<T: Ord, I> TransactionDatabase<T, I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a transaction, returning the items it replaced if `id` was already present.
    pub fn insert(&mut self, id: T, items: impl IntoIterator<Item = I>) -> Option<Vec<I>> {
        self.transactions.insert(id, items.into_iter().collect())
    }

    pub fn get(&self, id: &T) -> Option<&[I]> {
        self.transactions.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transactions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &[I])> + '_ {
        self.transactions
            .iter()
            .map(|(id, items)| (id, items.as_slice()))
    }
}

impl<I> TransactionDatabase<usize, I> {
    /// Number transactions by position, starting from zero.
    pub fn from_transactions<Tx>(transactions: impl IntoIterator<Item = Tx>) -> Self
    where
        Tx: IntoIterator<Item = I>,
    {
        transactions.into_iter().enumerate().collect()
    }
}

impl<T: Ord, I, Tx> FromIterator<(T, Tx)> for TransactionDatabase<T, I>
where
    Tx: IntoIterator<Item = I>,
{
    fn from_iter<It: IntoIterator<Item = (T, Tx)>>(iter: It) -> Self {
        Self {
            transactions: iter
                .into_iter()
                .map(|(id, items)| (id, items.into_iter().collect()))
                .collect(),
        }
    }
}
