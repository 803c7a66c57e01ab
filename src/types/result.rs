//! Generation Results
//!
//! Path-keyed accumulator for generated documents. Keys are unique and
//! iteration order is completion order, matching what the preview tree and
//! the archive builder expect.

use serde::{Deserialize, Serialize};

/// One successfully generated document.
///
/// Failed items are never stored; absence is the only failure marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub category: String,
    pub content: String,
}

/// Insertion-ordered mapping from original relative path to its result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    entries: Vec<(String, GenerationResult)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, path: impl Into<String>, result: GenerationResult) {
        let path = path.into();
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            entry.1 = result;
        } else {
            self.entries.push((path, result));
        }
    }

    pub fn get(&self, path: &str) -> Option<&GenerationResult> {
        self.entries.iter().find(|(p, _)| p == path).map(|(_, r)| r)
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.entries.iter().any(|(p, _)| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenerationResult)> {
        self.entries.iter().map(|(p, r)| (p.as_str(), r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn extend(&mut self, other: ResultSet) {
        for (path, result) in other.entries {
            self.insert(path, result);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
