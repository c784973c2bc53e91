//! Core data types for s3store.
//!
//! - `CacheValue`: arbitrary payload, JSON-shaped with a bytes variant
//! - `CacheEntry`: the serialized unit written to staging and uploaded
//! - `RemoteLocation`: object path plus public URL of an uploaded entry

pub mod entry;
pub mod location;
pub mod value;

// Re-export all public types
pub use entry::CacheEntry;
pub use location::RemoteLocation;
pub use value::CacheValue;
