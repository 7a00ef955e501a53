use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};

/// A set of distinct items held as an ascending, duplicate-free sequence.
///
/// Two itemsets with the same members are always equal and hash identically,
/// whatever order they were built from. Itemsets order lexicographically, which
/// is the order the join step depends on.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Itemset<I>(Vec<I>);

impl<I: Ord> Itemset<I> {
    pub fn new(items: impl IntoIterator<Item = I>) -> Self {
        let mut items: Vec<I> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn singleton(item: I) -> Self {
        Self(vec![item])
    }

    /// Wrap items that are already strictly ascending.
    pub(crate) fn from_sorted(items: Vec<I>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[I] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.0.iter()
    }

    pub fn into_items(self) -> Vec<I> {
        self.0
    }

    pub fn contains(&self, item: &I) -> bool {
        self.0.binary_search(item).is_ok()
    }

    /// Every item but the last.
    pub fn prefix(&self) -> &[I] {
        match self.0.split_last() {
            Some((_, prefix)) => prefix,
            None => &[],
        }
    }

    pub fn last(&self) -> Option<&I> {
        self.0.last()
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().all(|item| other.contains(item))
    }
}

impl<I: Ord + Clone> Itemset<I> {
    /// The itemset with the element at `index` removed, or `None` if `index` is
    /// out of range.
    pub fn without(&self, index: usize) -> Option<Self> {
        if index >= self.0.len() {
            return None;
        }
        let mut items = self.0.clone();
        items.remove(index);
        Some(Self(items))
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        )
    }
}

impl<I: Ord> FromIterator<I> for Itemset<I> {
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        Self::new(iter)
    }
}

impl<I> Borrow<[I]> for Itemset<I> {
    fn borrow(&self) -> &[I] {
        &self.0
    }
}

impl<I> AsRef<[I]> for Itemset<I> {
    fn as_ref(&self) -> &[I] {
        &self.0
    }
}

impl<'a, I> IntoIterator for &'a Itemset<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Debug> Debug for Itemset<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl<I: Display> Display for Itemset<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}
