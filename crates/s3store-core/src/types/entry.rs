//! The serialized unit of storage.

use serde::{Deserialize, Serialize};

use super::CacheValue;
use crate::error::{StoreError, StoreResult};

/// A cache entry as written to the staging file and uploaded verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Caller-chosen cache key
    pub key: String,
    /// Staging path the entry was written to
    #[serde(default)]
    pub filename: String,
    /// Byte length of the serialized entry
    #[serde(default)]
    pub size: u64,
    /// Cached payload
    pub value: CacheValue,
}

impl CacheEntry {
    /// Create a new entry; `size` is filled in by [`CacheEntry::to_body`]
    pub fn new(key: impl Into<String>, value: CacheValue, filename: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            filename: filename.into(),
            size: 0,
            value,
        }
    }

    /// Serialize to the JSON body stored on disk and in the object store.
    ///
    /// `size` is part of the body, so it is recomputed until it equals the
    /// byte length of the body it appears in.
    pub fn to_body(&mut self) -> StoreResult<String> {
        let mut body = self.serialize_json()?;
        while self.size != body.len() as u64 {
            self.size = body.len() as u64;
            body = self.serialize_json()?;
        }
        Ok(body)
    }

    fn serialize_json(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(|e| StoreError::Serialization {
            key: self.key.clone(),
            message: e.to_string(),
        })
    }
}
