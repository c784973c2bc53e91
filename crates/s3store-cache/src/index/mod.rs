//! Remote location index
//!
//! In-memory map from cache key to the remote location of its uploaded
//! object. Only keys this process has uploaded or successfully resolved are
//! present; nothing is persisted.

use dashmap::DashMap;
use s3store_core::types::RemoteLocation;

/// Index of cache keys to remote locations
#[derive(Debug, Default)]
pub struct RemoteIndex {
    /// In-memory index of entries
    entries: DashMap<String, RemoteLocation>,
}

impl RemoteIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the remote location of a key
    pub fn lookup(&self, key: &str) -> Option<RemoteLocation> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Record the location of a key, returning the previous one
    pub fn insert(&self, key: String, location: RemoteLocation) -> Option<RemoteLocation> {
        self.entries.insert(key, location)
    }

    /// Remove a key
    pub fn remove(&self, key: &str) -> Option<RemoteLocation> {
        self.entries.remove(key).map(|(_, location)| location)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get all keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
