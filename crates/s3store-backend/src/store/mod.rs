//! The S3 store facade
//!
//! Per key, an entry moves from absent to staged (while `set` runs) to
//! remote (indexed), and back to absent on `del`. The index only ever holds
//! locations the object store has accepted or served.
//!
//! Writes and deletes of one key are serialized: they share the key's
//! staging file and object.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use dashmap::DashMap;
use s3store_cache::{KeyCodec, RemoteIndex, StagingWriter};
use s3store_config::{validate_options, S3Options, StoreOptions};
use s3store_core::error::{StoreError, StoreResult};
use s3store_core::types::{CacheValue, RemoteLocation};
use s3store_remote::{
    AuthConfig, ClientConfig, HttpObjectStore, MissReason, ObjectLayout, ObjectStore, ReadOutcome,
    RemoteReader, RemoteUploader,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::contract::CacheStore;

/// Name reported to the host cache manager
pub const STORE_NAME: &str = "s3store";

/// Cache store backed by an S3-compatible object store
#[derive(Clone)]
pub struct S3Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    options: StoreOptions,
    staging: StagingWriter,
    uploader: RemoteUploader,
    reader: RemoteReader,
    objects: Arc<dyn ObjectStore>,
    index: RemoteIndex,
    /// Write locks of keys with a `set` or `del` in flight
    key_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl S3Store {
    /// Create a store talking HTTP to the configured bucket
    pub fn new(options: StoreOptions) -> StoreResult<Self> {
        validate_options(&options)?;
        let objects = HttpObjectStore::new(client_config(&options.s3))?;
        Self::with_object_store(options, Arc::new(objects))
    }

    /// Create a store on top of any object store implementation
    pub fn with_object_store(options: StoreOptions, objects: Arc<dyn ObjectStore>) -> StoreResult<Self> {
        validate_options(&options)?;

        let public_url = options
            .s3
            .public_url
            .as_deref()
            .ok_or_else(|| StoreError::config("s3.public_url", "a public base URL is required"))?;

        let codec = KeyCodec::new(options.site.clone());
        let staging = StagingWriter::new(&options.path, codec)?;
        let layout = ObjectLayout::new(options.s3.root.clone(), public_url);

        debug!(
            staging = %staging.root(),
            public_url = layout.public_base(),
            tryget = options.tryget,
            "created s3 store"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                uploader: RemoteUploader::new(Arc::clone(&objects), layout),
                reader: RemoteReader::new(Arc::clone(&objects)),
                options,
                staging,
                objects,
                index: RemoteIndex::new(),
                key_locks: DashMap::new(),
            }),
        })
    }

    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    pub fn codec(&self) -> &KeyCodec {
        self.inner.staging.codec()
    }

    /// Staging file a `set` of `key` writes to
    pub fn staging_path(&self, key: &str) -> Utf8PathBuf {
        self.inner.staging.staging_path(key)
    }

    /// Location `key` is stored at, derived from the key alone
    pub fn location_for(&self, key: &str) -> RemoteLocation {
        self.inner
            .uploader
            .layout()
            .locate(self.staging_path(key).as_str())
    }

    /// Location recorded for `key`, if any
    pub fn indexed_location(&self, key: &str) -> Option<RemoteLocation> {
        self.inner.index.lookup(key)
    }

    /// Bulk cleanup of the staging area is not supported
    pub async fn clean_cache(&self) -> StoreResult<()> {
        Err(StoreError::Unsupported {
            operation: "clean_cache",
        })
    }

    /// Warming the index from the object store is not supported
    pub async fn initialize_fill(&self) -> StoreResult<()> {
        Err(StoreError::Unsupported {
            operation: "initialize_fill",
        })
    }

    /// Delete the object at the derived location of `key`, indexed or not
    pub async fn delete_derived(&self, key: &str) -> StoreResult<()> {
        let guard = self.lock_key(key).await;
        let location = self.location_for(key);
        let result = self.delete_remote(key, &location).await;
        self.release_key(key, guard);
        result
    }

    async fn lock_key(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(
            self.inner
                .key_locks
                .entry(key.to_string())
                .or_default()
                .value(),
        );
        lock.lock_owned().await
    }

    /// Drop the guard and forget the lock once nobody else waits on it
    fn release_key(&self, key: &str, guard: OwnedMutexGuard<()>) {
        drop(guard);
        self.inner
            .key_locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn stage_and_upload(&self, key: &str, value: &CacheValue) -> StoreResult<()> {
        let staged = self.inner.staging.stage(key, value).await?;
        let location = self.inner.uploader.upload(&staged.path).await?;

        debug!(key, url = %location.url, size = staged.entry.size, "indexing cache entry");
        self.inner.index.insert(key.to_string(), location);
        Ok(())
    }

    async fn delete_remote(&self, key: &str, location: &RemoteLocation) -> StoreResult<()> {
        let response = self
            .inner
            .objects
            .delete_object(&location.path)
            .await
            .map_err(|e| StoreError::Delete {
                status: None,
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(StoreError::Delete {
                status: Some(response.status),
                message: response.reason(),
            });
        }

        self.inner.index.remove(key);
        info!(key, path = %location.path, "deleted cache entry");
        Ok(())
    }
}

#[async_trait]
impl CacheStore for S3Store {
    fn name(&self) -> &'static str {
        STORE_NAME
    }

    async fn set(&self, key: &str, value: CacheValue) -> StoreResult<CacheValue> {
        let guard = self.lock_key(key).await;
        let result = self.stage_and_upload(key, &value).await;
        self.release_key(key, guard);

        result.map(|()| value)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<CacheValue>> {
        let location = match self.inner.index.lookup(key) {
            Some(location) => location,
            None if self.inner.options.tryget => self.location_for(key),
            None => {
                debug!(key, "cache miss, key not indexed");
                return Ok(None);
            },
        };

        match self.inner.reader.read(&location).await {
            ReadOutcome::Hit(value) => {
                self.inner.index.insert(key.to_string(), location);
                Ok(Some(value))
            },
            ReadOutcome::Miss(MissReason::Transport(detail)) => {
                warn!(key, url = %location.url, error = %detail, "cache read failed, treating as miss");
                Ok(None)
            },
            ReadOutcome::Miss(reason) => {
                debug!(key, url = %location.url, %reason, "cache miss");
                Ok(None)
            },
        }
    }

    async fn del(&self, key: &str) -> StoreResult<()> {
        let guard = self.lock_key(key).await;
        let result = match self.inner.index.lookup(key) {
            Some(location) => self.delete_remote(key, &location).await,
            None => {
                debug!(key, "delete of unindexed key is a no-op");
                Ok(())
            },
        };
        self.release_key(key, guard);

        result
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.inner.index.keys())
    }

    async fn reset(&self) -> StoreResult<()> {
        Err(StoreError::Unsupported { operation: "reset" })
    }

    async fn clean_expired(&self) -> StoreResult<()> {
        Err(StoreError::Unsupported {
            operation: "clean_expired",
        })
    }
}

/// HTTP client settings for the configured bucket
pub fn client_config(s3: &S3Options) -> ClientConfig {
    let defaults = ClientConfig::default();

    ClientConfig {
        endpoint: s3.endpoint.clone(),
        bucket: s3.bucket.clone(),
        region: s3.region.clone().unwrap_or(defaults.region),
        path_style: s3.is_path_style(),
        timeout: Duration::from_secs(s3.timeout_secs),
        auth: AuthConfig {
            token: s3.bearer_token.clone(),
            access_key: s3.key.clone(),
            secret_key: s3.secret.clone(),
            session_token: s3.token.clone(),
        },
    }
}
