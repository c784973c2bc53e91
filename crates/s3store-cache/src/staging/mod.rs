//! Local staging of cache entries
//!
//! Entries are serialized to `<root>/cache_<token>.dat` before upload. The
//! writer never cleans up after itself; the uploader removes the file once
//! the object store has answered.

use camino::{Utf8Path, Utf8PathBuf};
use s3store_core::error::StoreError;
use s3store_core::types::{CacheEntry, CacheValue};
use std::fs;
use tracing::debug;

use crate::codec::KeyCodec;
use crate::CacheResult;

/// A staged entry waiting for upload
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Path of the staging file
    pub path: Utf8PathBuf,
    /// Entry as written, with its final size
    pub entry: CacheEntry,
}

/// Writes cache entries to the local staging directory
#[derive(Debug, Clone)]
pub struct StagingWriter {
    /// Staging root (as configured, may be relative)
    root: Utf8PathBuf,
    codec: KeyCodec,
}

impl StagingWriter {
    /// Create a writer, creating the staging root if it does not exist
    pub fn new<P: AsRef<Utf8Path>>(root: P, codec: KeyCodec) -> CacheResult<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).map_err(|e| {
            StoreError::io(format!("Failed to create staging directory {}", root), e)
        })?;

        Ok(Self { root, codec })
    }

    /// Get the staging root
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    /// Staging path for a key: `<root>/cache_<token>.dat`
    pub fn staging_path(&self, key: &str) -> Utf8PathBuf {
        self.root.join(format!("cache_{}.dat", self.codec.encode(key)))
    }

    /// Serialize an entry to its staging file
    pub async fn stage(&self, key: &str, value: &CacheValue) -> CacheResult<StagedFile> {
        let path = self.staging_path(key);
        let mut entry = CacheEntry::new(key, value.clone(), path.as_str());
        let body = entry.to_body()?;

        tokio::fs::write(&path, body.as_bytes())
            .await
            .map_err(|e| StoreError::io(format!("Failed to write staging file {}", path), e))?;

        debug!(key, path = %path, size = entry.size, "staged cache entry");

        Ok(StagedFile { path, entry })
    }
}
