//! Deduplicating id lists used for every stored relationship array.

use serde::{Deserialize, Deserializer, Serialize};

/// An ordered list of entity ids with set-like mutation.
///
/// `insert` never creates a duplicate and `remove` drops every occurrence,
/// so callers never filter or concat raw arrays themselves. Lists read from
/// the store keep whatever they contained, duplicates included, so the audit
/// can see them. A missing or `null` field deserializes as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdList(Vec<String>);

impl IdList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    /// Append `id` unless it is already present. Returns true if appended.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    /// Remove every occurrence of `id`. Returns true if anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    /// Append `id` unless it is already the last entry.
    ///
    /// Non-adjacent repeats are kept: history lists record every cycle.
    pub fn push_unless_last(&mut self, id: &str) -> bool {
        if self.last() == Some(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    /// Replace the whole list.
    pub fn replace(&mut self, ids: Vec<String>) {
        self.0 = ids;
    }

    /// Last entry, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Iterate over the ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Borrow the ids as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Ids that occur more than once, each reported once, in first-seen order.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for id in self.iter() {
            if !seen.insert(id) && !dups.contains(&id) {
                dups.push(id);
            }
        }
        dups
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'de> Deserialize<'de> for IdList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(IdList(ids))
    }
}

impl<S: Into<String>> FromIterator<S> for IdList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IdList(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for IdList {
    fn from(ids: Vec<String>) -> Self {
        IdList(ids)
    }
}

impl PartialEq<[&str]> for IdList {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for IdList {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}
