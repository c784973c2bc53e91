//! Read-back of uploaded entries
//!
//! A read either yields the stored value or a miss with its reason. Callers
//! that only care about presence use [`ReadOutcome::into_value`], which folds
//! every miss (including transport failures) into `None`.

use std::fmt;
use std::sync::Arc;

use s3store_core::types::{CacheValue, RemoteLocation};
use serde_json::Value;
use tracing::debug;

use crate::store::ObjectStore;

/// Why a read produced no value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The store answered with a non-success status
    NotFound(u16),
    /// The store answered with an empty body
    EmptyBody,
    /// The body is not a stored cache entry
    Malformed(String),
    /// The request could not be completed
    Transport(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NotFound(status) => write!(f, "not found (status {})", status),
            MissReason::EmptyBody => f.write_str("empty body"),
            MissReason::Malformed(detail) => write!(f, "malformed body: {}", detail),
            MissReason::Transport(detail) => write!(f, "transport failure: {}", detail),
        }
    }
}

/// Result of reading an entry back
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Hit(CacheValue),
    Miss(MissReason),
}

impl ReadOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, ReadOutcome::Hit(_))
    }

    /// The value on a hit, `None` on any miss
    pub fn into_value(self) -> Option<CacheValue> {
        match self {
            ReadOutcome::Hit(value) => Some(value),
            ReadOutcome::Miss(_) => None,
        }
    }
}

/// Fetches entries from their public location
#[derive(Clone)]
pub struct RemoteReader {
    store: Arc<dyn ObjectStore>,
}

impl RemoteReader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Fetch and decode the entry stored at `location`
    pub async fn read(&self, location: &RemoteLocation) -> ReadOutcome {
        let response = match self.store.fetch(&location.url).await {
            Ok(response) => response,
            Err(e) => return ReadOutcome::Miss(MissReason::Transport(e.to_string())),
        };

        if !response.is_success() {
            return ReadOutcome::Miss(MissReason::NotFound(response.status));
        }

        match parse_body(&response.body) {
            Ok(value) => ReadOutcome::Hit(value),
            Err(reason) => {
                debug!(url = %location.url, %reason, "discarding unreadable entry");
                ReadOutcome::Miss(reason)
            },
        }
    }
}

/// Extract the value of a stored entry body, reviving binary buffers
pub fn parse_body(body: &[u8]) -> Result<CacheValue, MissReason> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(MissReason::EmptyBody);
    }

    let parsed: Value =
        serde_json::from_slice(body).map_err(|e| MissReason::Malformed(e.to_string()))?;

    match parsed {
        Value::Object(mut fields) => fields
            .remove("value")
            .map(CacheValue::revive)
            .ok_or_else(|| MissReason::Malformed("missing 'value' field".to_string())),
        _ => Err(MissReason::Malformed("body is not an object".to_string())),
    }
}
