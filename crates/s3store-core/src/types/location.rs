//! Where an uploaded entry lives.

use serde::{Deserialize, Serialize};

/// Remote location of an uploaded cache entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteLocation {
    /// Object path inside the bucket, always starting with `/`
    pub path: String,
    /// Publicly fetchable URL of the object
    pub url: String,
}

impl RemoteLocation {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

impl std::fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}
