//! Bookmarked and compared entity ids

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of entities compared side by side
pub const MAX_COMPARE: usize = 3;

/// Entity ids the user bookmarked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bookmarks(BTreeSet<String>);

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it otherwise; returns whether it is now bookmarked
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Ids in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &String> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for Bookmarks {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Up to [`MAX_COMPARE`] entity ids, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompareSet(Vec<String>);

impl CompareSet {
    /// Remove `id` if present, otherwise add it while there is room
    ///
    /// Returns whether `id` is in the set afterwards. Adding to a full set
    /// leaves it unchanged.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(index) = self.0.iter().position(|existing| existing == id) {
            self.0.remove(index);
            false
        } else if self.0.len() < MAX_COMPARE {
            self.0.push(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_COMPARE
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_toggle() {
        let mut bookmarks = Bookmarks::new();
        assert!(bookmarks.toggle("7"));
        assert!(bookmarks.contains("7"));
        assert!(!bookmarks.toggle("7"));
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_compare_caps_at_three() {
        let mut compare = CompareSet::default();
        assert!(compare.toggle("1"));
        assert!(compare.toggle("2"));
        assert!(compare.toggle("3"));
        assert!(compare.is_full());

        assert!(!compare.toggle("4"));
        assert_eq!(compare.ids(), &["1", "2", "3"]);

        assert!(!compare.toggle("2"));
        assert!(compare.toggle("4"));
        assert_eq!(compare.ids(), &["1", "3", "4"]);
    }
}
