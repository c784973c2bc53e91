//! Utility functions and helpers.
//!
//! Common functionality used across multiple s3store crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{join_object_path, normalize_object_path};
