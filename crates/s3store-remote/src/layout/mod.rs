//! Object naming
//!
//! An entry staged at `<staging path>` is stored at
//! `/<root>/<staging path>` and published at `<public base><object path>`.
//! The same rule derives the try-get location of keys the index has never
//! seen.

use s3store_core::types::RemoteLocation;
use s3store_core::utils::join_object_path;

/// Maps staging paths to object paths and public URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLayout {
    /// Prefix prepended to every object path
    root: Option<String>,
    /// Public base URL, without trailing slash
    public_base: String,
}

impl ObjectLayout {
    pub fn new(root: Option<String>, public_base: &str) -> Self {
        Self {
            root: root.filter(|r| !r.trim_matches('/').is_empty()),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn public_base(&self) -> &str {
        &self.public_base
    }

    /// Object path of a staging path
    pub fn remote_path(&self, staging_path: &str) -> String {
        join_object_path(self.root.as_deref(), staging_path)
    }

    /// Public URL of an object path
    pub fn public_url(&self, remote_path: &str) -> String {
        format!("{}{}", self.public_base, remote_path)
    }

    /// Full remote location of a staging path
    pub fn locate(&self, staging_path: &str) -> RemoteLocation {
        let path = self.remote_path(staging_path);
        let url = self.public_url(&path);
        RemoteLocation { path, url }
    }
}
