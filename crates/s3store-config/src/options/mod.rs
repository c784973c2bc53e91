//! Store options and their validation

use serde::{Deserialize, Serialize};
use s3store_core::error::StoreError;

use crate::ConfigResult;

/// Default staging directory
pub const DEFAULT_PATH: &str = "cache/";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Complete store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Local staging directory
    pub path: String,

    /// Fetch un-indexed keys from their derived location
    pub tryget: bool,

    /// Substring stripped from keys before encoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// Object store settings
    pub s3: S3Options,
}

/// Object store section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Options {
    /// Access key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Secret key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Temporary session token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Bearer token, used instead of key/secret when set
    #[serde(skip_serializing_if = "Option::is_none", alias = "bearerToken")]
    pub bearer_token: Option<String>,

    /// Bucket name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Bucket region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Explicit endpoint for S3-compatible stores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Bucket addressing: `virtualHosted` (default) or `path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Prefix prepended to every object path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Public base URL objects are read back from
    #[serde(skip_serializing_if = "Option::is_none", alias = "publicURL", alias = "publicUrl")]
    pub public_url: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            tryget: true,
            site: None,
            s3: S3Options::default(),
        }
    }
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            key: None,
            secret: None,
            token: None,
            bearer_token: None,
            bucket: None,
            region: None,
            endpoint: None,
            style: None,
            root: None,
            public_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl S3Options {
    /// Check if the bucket is addressed as `<endpoint>/<bucket>`
    pub fn is_path_style(&self) -> bool {
        self.style.as_deref() == Some("path")
    }
}

/// Validate configuration completeness
pub fn validate_options(options: &StoreOptions) -> ConfigResult<()> {
    if options.path.trim().is_empty() {
        return Err(StoreError::config("path", "staging path must not be empty"));
    }

    let public_url = options
        .s3
        .public_url
        .as_deref()
        .ok_or_else(|| StoreError::config("s3.public_url", "a public base URL is required"))?;

    let parsed = url::Url::parse(public_url)
        .map_err(|e| StoreError::config("s3.public_url", format!("invalid URL '{}': {}", public_url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(StoreError::config(
            "s3.public_url",
            format!("unsupported scheme '{}', expected http or https", parsed.scheme()),
        ));
    }

    if let Some(style) = options.s3.style.as_deref() {
        if style != "path" && style != "virtualHosted" {
            return Err(StoreError::config(
                "s3.style",
                format!("unknown style '{}', expected 'path' or 'virtualHosted'", style),
            ));
        }
    }

    if options.s3.timeout_secs == 0 {
        return Err(StoreError::config("s3.timeout_secs", "timeout must be at least one second"));
    }

    Ok(())
}
