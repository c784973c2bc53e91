//! Remote side of the s3store cache backend
//!
//! This crate provides the object store seam and everything that talks to it:
//! an HTTP client for S3-compatible stores, the uploader that pushes staged
//! files with a public-read policy, and the reader that fetches entries back
//! from their public location.

pub mod client;
pub mod layout;
pub mod reader;
pub mod store;
pub mod upload;

// Re-export main types
pub use client::{AuthConfig, ClientConfig, HttpObjectStore};
pub use layout::ObjectLayout;
pub use reader::{MissReason, ReadOutcome, RemoteReader};
pub use store::{ObjectResponse, ObjectStore, PutOptions};
pub use upload::RemoteUploader;

use s3store_core::error::StoreError;

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, StoreError>;
