use std::ops::Deref;

/// Items that can be narrowed down by comparing fields against a criteria set.
pub trait Searchable {
    type Criteria: Default;

    /// Every field set in `criteria` must equal the corresponding item field.
    fn matches(&self, criteria: &Self::Criteria) -> bool;
}

/// An ordered list of entities scraped from a single page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection<T>(Vec<T>);

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self(items)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    /// Keeps the items accepted by `predicate`, preserving their order.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self
    where
        T: Clone,
    {
        self.0.iter().filter(|item| predicate(item)).cloned().collect()
    }
}

impl<T: Searchable + Clone> Collection<T> {
    pub fn search(&self, criteria: &T::Criteria) -> Self {
        self.filter(|item| item.matches(criteria))
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Site text comparisons ignore case.
pub(crate) fn text_eq(expected: &Option<String>, actual: &str) -> bool {
    expected
        .as_ref()
        .is_none_or(|expected| expected.to_lowercase() == actual.to_lowercase())
}

pub(crate) fn field_eq<T: PartialEq>(expected: &Option<T>, actual: &T) -> bool {
    expected.as_ref().is_none_or(|expected| expected == actual)
}
