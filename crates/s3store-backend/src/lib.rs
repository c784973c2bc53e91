//! S3 cache store
//!
//! This crate ties the local and remote halves together behind the store
//! contract a cache manager calls: entries are staged to disk, uploaded with
//! a public-read policy, indexed in memory and read back from their public
//! URL.

pub mod contract;
pub mod store;

// Re-export main types
pub use contract::CacheStore;
pub use store::S3Store;

pub use s3store_config::StoreOptions;
pub use s3store_core::{CacheValue, StoreError, StoreResult};

/// Build a store from validated options
pub fn create(options: StoreOptions) -> StoreResult<S3Store> {
    S3Store::new(options)
}

/// Build a store from a JSON document, bare or wrapped as `{"options": {...}}`
pub fn create_from_json(content: &str) -> StoreResult<S3Store> {
    let options = s3store_config::json::parse_options_json(content)?;
    S3Store::new(options)
}
