//! Upload of staged entries
//!
//! The staging file is removed once the store has answered, whatever the
//! answer was. Removal failures are logged and swallowed.

use std::sync::Arc;

use camino::Utf8Path;
use s3store_core::error::StoreError;
use s3store_core::types::RemoteLocation;
use tracing::{debug, info};

use crate::layout::ObjectLayout;
use crate::store::{ObjectStore, PutOptions};
use crate::RemoteResult;

/// Pushes staged files to the object store
#[derive(Clone)]
pub struct RemoteUploader {
    store: Arc<dyn ObjectStore>,
    layout: ObjectLayout,
}

impl RemoteUploader {
    pub fn new(store: Arc<dyn ObjectStore>, layout: ObjectLayout) -> Self {
        Self { store, layout }
    }

    pub fn layout(&self) -> &ObjectLayout {
        &self.layout
    }

    /// Upload a staged file and return where it can be read back.
    ///
    /// Fails with `StoreError::Upload` when the store rejects the object or
    /// cannot be reached, and with `StoreError::Io` when the staging file
    /// cannot be read.
    pub async fn upload(&self, staging_path: &Utf8Path) -> RemoteResult<RemoteLocation> {
        let location = self.layout.locate(staging_path.as_str());

        let result = self.put_staged(staging_path, &location).await;
        discard_staging_file(staging_path).await;
        result?;

        info!(path = %location.path, "uploaded cache entry");
        Ok(location)
    }

    async fn put_staged(&self, staging_path: &Utf8Path, location: &RemoteLocation) -> RemoteResult<()> {
        let body = tokio::fs::read(staging_path).await.map_err(|e| {
            StoreError::io(format!("Failed to read staging file {}", staging_path), e)
        })?;

        let response = self
            .store
            .put_object(&location.path, body, &PutOptions::public_json())
            .await
            .map_err(|e| StoreError::Upload {
                status: None,
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(StoreError::Upload {
                status: Some(response.status),
                message: response.reason(),
            });
        }

        Ok(())
    }
}

/// Best-effort removal of a staging file
async fn discard_staging_file(path: &Utf8Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path, "removed staging file"),
        Err(e) => debug!(path = %path, error = %e, "could not remove staging file"),
    }
}
