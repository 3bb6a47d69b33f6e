//! Interest Tags
//!
//! Ordered, deduplicated collection of free-form tags. Order is first-added
//! order; removing a tag keeps the relative order of the rest.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Ordered set of interest tags.
///
/// Equality compares membership only; use [`InterestSet::to_vec`] when the
/// order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestSet(IndexSet<String>);

impl InterestSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Copy with `tag` removed if present, otherwise appended at the end.
    pub fn toggled(&self, tag: &str) -> Self {
        let mut next = self.clone();
        if !next.0.shift_remove(tag) {
            next.0.insert(tag.to_string());
        }
        next
    }

    /// Copy with `tag` appended if absent; unchanged otherwise.
    pub fn with_tag(&self, tag: &str) -> Self {
        let mut next = self.clone();
        next.0.insert(tag.to_string());
        next
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<String> for InterestSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for InterestSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Remove `tag` if present, otherwise append it. Calling twice with the same
/// tag returns the original set.
pub fn toggle_interest(interests: &InterestSet, tag: &str) -> InterestSet {
    interests.toggled(tag)
}
