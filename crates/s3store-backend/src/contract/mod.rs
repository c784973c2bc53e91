//! Store contract called by the host cache manager
//!
//! A miss is `Ok(None)`, never an error. Hooks a backend has no semantics
//! for return `StoreError::Unsupported`.

use async_trait::async_trait;
use s3store_core::error::StoreResult;
use s3store_core::types::CacheValue;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend identifier reported to the host
    fn name(&self) -> &'static str;

    /// Whether the host should hand `value` to this store at all
    fn is_cacheable_value(&self, value: &CacheValue) -> bool {
        !value.is_null()
    }

    /// Store `value` under `key` and return the stored value
    async fn set(&self, key: &str, value: CacheValue) -> StoreResult<CacheValue>;

    async fn get(&self, key: &str) -> StoreResult<Option<CacheValue>>;

    /// Remove `key`; removing an unknown key succeeds
    async fn del(&self, key: &str) -> StoreResult<()>;

    async fn keys(&self) -> StoreResult<Vec<String>>;

    async fn reset(&self) -> StoreResult<()>;

    /// Expiry sweep
    async fn clean_expired(&self) -> StoreResult<()>;
}
