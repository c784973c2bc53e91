//! Local side of the s3store cache backend
//!
//! This crate provides the pieces that never touch the network: the key
//! codec that turns arbitrary cache keys into path-safe tokens, the staging
//! writer that serializes entries to local disk before upload, and the
//! in-memory index of remote locations.

pub mod codec;
pub mod index;
pub mod staging;

// Re-export main types
pub use codec::KeyCodec;
pub use index::RemoteIndex;
pub use staging::{StagedFile, StagingWriter};

use s3store_core::error::StoreError;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, StoreError>;
