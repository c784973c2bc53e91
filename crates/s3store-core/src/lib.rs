//! # s3store-core
//!
//! Core types and utilities shared across all s3store crates.
//!
//! This crate provides:
//! - `StoreError` enum for unified error handling
//! - `CacheValue`, the payload model with binary buffer revival
//! - `CacheEntry`, the staged/uploaded body of a cache entry
//! - `RemoteLocation`, where an entry lives in the object store
//! - Path helpers for building object paths
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (CacheValue, CacheEntry, RemoteLocation)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use types::{CacheEntry, CacheValue, RemoteLocation};
