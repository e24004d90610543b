//! Ordered collision set produced by the report parser.

use std::collections::HashMap;

/// Ordered mapping from a duplicate hash to the filenames reported for it.
///
/// Hashes are unique and iterate in the order they first appeared in the
/// report. The set is immutable once the parser hands it out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionSet {
    /// Records in first-seen order.
    entries: Vec<(String, Vec<String>)>,
    /// Hash to position in `entries`.
    index: HashMap<String, usize>,
}

impl CollisionSet {
    /// Create an empty collision set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new hash with its filenames.
    ///
    /// Returns `false` and leaves the set untouched if the hash is already
    /// present.
    pub(crate) fn insert(&mut self, hash: String, filenames: Vec<String>) -> bool {
        if self.index.contains_key(&hash) {
            return false;
        }
        self.index.insert(hash.clone(), self.entries.len());
        self.entries.push((hash, filenames));
        true
    }

    /// Check whether a hash has been registered.
    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    /// Number of collisions (hashes) in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the report contained no collisions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hashes in first-seen order.
    pub fn hashes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(hash, _)| hash.as_str())
    }

    /// Filenames reported for `hash`, if the hash is known.
    #[must_use]
    pub fn filenames(&self, hash: &str) -> Option<&[String]> {
        self.index
            .get(hash)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Iterate over `(hash, filenames)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(hash, files)| (hash.as_str(), files.as_slice()))
    }

    /// Total number of filenames across every collision.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().map(|(_, files)| files.len()).sum()
    }
}
