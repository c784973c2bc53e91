//! Object store seam
//!
//! The backend only needs three primitives from an object store: put an
//! object, delete an object, and fetch a public URL. Implementations report
//! the HTTP status of every answered request and only fail when the request
//! could not be completed at all.

use async_trait::async_trait;

use crate::RemoteResult;

/// Options for an object upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Canned ACL (`x-amz-acl`)
    pub acl: Option<String>,
    /// Content type of the body
    pub content_type: Option<String>,
}

impl PutOptions {
    /// Publicly readable JSON object
    pub fn public_json() -> Self {
        Self {
            acl: Some("public-read".to_string()),
            content_type: Some("application/json".to_string()),
        }
    }
}

/// Answer of the object store to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl ObjectResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Canonical reason phrase of the status, or the status itself
    pub fn reason(&self) -> String {
        reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .map(str::to_string)
            .unwrap_or_else(|| format!("status {}", self.status))
    }
}

/// Storage primitives the backend relies on
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `body` to `path` (absolute path inside the bucket)
    async fn put_object(
        &self,
        path: &str,
        body: Vec<u8>,
        options: &PutOptions,
    ) -> RemoteResult<ObjectResponse>;

    /// Delete the object at `path`
    async fn delete_object(&self, path: &str) -> RemoteResult<ObjectResponse>;

    /// Fetch a public URL without credentials
    async fn fetch(&self, url: &str) -> RemoteResult<ObjectResponse>;
}
