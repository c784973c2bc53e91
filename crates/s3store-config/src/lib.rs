//! Configuration for the s3store cache backend
//!
//! This crate handles parsing and validation of `s3store.toml` and
//! `s3store.json` files, layering them with environment and command-line
//! overrides into a single [`StoreOptions`].

pub mod json;
pub mod merge;
pub mod options;
pub mod toml;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use options::{validate_options, S3Options, StoreOptions};

use s3store_core::error::StoreError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, StoreError>;
