//! The bucket index accumulator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aspect-ratio key → image paths, in insertion order per bucket.
///
/// Append-only: buckets are created on first insert and nothing is ever
/// removed. Keys iterate in sorted order. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketIndex {
    buckets: BTreeMap<String, Vec<String>>,
}

impl BucketIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` to the bucket `key`, creating the bucket if needed.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<String>) {
        self.buckets.entry(key.into()).or_default().push(path.into());
    }

    /// Paths in bucket `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of paths across all buckets.
    pub fn total_images(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.buckets
            .iter()
            .map(|(key, paths)| (key.as_str(), paths.as_slice()))
    }

    /// Append every bucket of `other` after this index's entries.
    ///
    /// Used to combine per-worker indexes; merging workers in a fixed order
    /// gives a deterministic result.
    pub fn merge(&mut self, other: BucketIndex) {
        for (key, paths) in other.buckets {
            self.buckets.entry(key).or_default().extend(paths);
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.buckets
    }
}

impl From<BTreeMap<String, Vec<String>>> for BucketIndex {
    fn from(buckets: BTreeMap<String, Vec<String>>) -> Self {
        Self { buckets }
    }
}
