//! The criteria container.

use crate::value::Value;

/// An ordered collection of `key => value` predicates.
///
/// Keys encode the attribute and operator (see [`split_key`](crate::split_key)).
/// [`add`](Criteria::add) appends, so two entries with the same key may
/// coexist; [`set`](Criteria::set) replaces.
///
/// # Example
///
/// ```
/// use sieve_criteria::{Criteria, Value};
///
/// let mut criteria = Criteria::new();
/// criteria.add("name", "Smith").add("age :between", vec![20, 55]);
///
/// assert_eq!(criteria.len(), 2);
/// assert_eq!(criteria.get("name"), Some(&Value::from("Smith")));
/// assert_eq!(criteria, Criteria::from([
///     ("name", Value::from("Smith")),
///     ("age :between", Value::from(vec![20, 55])),
/// ]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Value)>,
}

impl Criteria {
    /// Creates an empty container.
    pub fn new() -> Self {
        Criteria::default()
    }

    /// Appends a predicate.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Replaces the first predicate with the same key, or appends it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Removes every predicate with the given key.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.retain(|(k, _)| k != key);
        self
    }

    /// Returns the value of the first predicate with the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if a predicate with the given key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns all predicates, in insertion order.
    pub fn all(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over predicates.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Criteria {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Criteria {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Criteria {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}
