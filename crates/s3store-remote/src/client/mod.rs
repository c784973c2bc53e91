//! HTTP client for S3-compatible object stores

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use s3store_core::error::StoreError;
use tracing::debug;

use crate::store::{ObjectResponse, ObjectStore, PutOptions};
use crate::RemoteResult;

/// Credentials forwarded to the object store
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token for authentication
    pub token: Option<String>,
    /// Access key, sent as the basic auth username
    pub access_key: Option<String>,
    /// Secret key, sent as the basic auth password
    pub secret_key: Option<String>,
    /// Temporary session token (`x-amz-security-token`)
    pub session_token: Option<String>,
}

/// Where and how to reach the object store
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Explicit endpoint for S3-compatible stores
    pub endpoint: Option<String>,
    /// Bucket name
    pub bucket: Option<String>,
    /// Bucket region, used for the default AWS endpoint
    pub region: String,
    /// Address the bucket as `<endpoint>/<bucket>` instead of a subdomain
    pub path_style: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Credentials
    pub auth: AuthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            bucket: None,
            region: "us-east-1".to_string(),
            path_style: false,
            timeout: Duration::from_secs(30),
            auth: AuthConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Base URL every object path is appended to
    pub fn base_url(&self) -> RemoteResult<String> {
        let base = match (&self.endpoint, &self.bucket) {
            (Some(endpoint), Some(bucket)) if self.path_style => {
                format!("{}/{}", endpoint.trim_end_matches('/'), bucket)
            },
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(bucket)) if self.path_style => {
                format!("https://s3.{}.amazonaws.com/{}", self.region, bucket)
            },
            (None, Some(bucket)) => format!("https://{}.s3.{}.amazonaws.com", bucket, self.region),
            (None, None) => {
                return Err(StoreError::config(
                    "s3.bucket",
                    "either a bucket or an endpoint is required",
                ))
            },
        };

        url::Url::parse(&base)
            .map_err(|e| StoreError::config("s3.endpoint", format!("invalid URL '{}': {}", base, e)))?;

        Ok(base)
    }
}

/// Object store client speaking plain HTTP PUT/DELETE/GET
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    /// Client carrying the store credentials
    client: Client,
    /// Client for public reads, never sends credentials
    public_client: Client,
    /// Bucket base URL
    base_url: String,
}

impl HttpObjectStore {
    /// Create a client from its configuration
    pub fn new(config: ClientConfig) -> RemoteResult<Self> {
        let base_url = config.base_url()?;

        let client = Self::builder(config.timeout)
            .default_headers(Self::auth_headers(&config.auth)?)
            .build()
            .map_err(|e| StoreError::network(format!("Failed to create HTTP client: {}", e), e))?;

        let public_client = Self::builder(config.timeout)
            .build()
            .map_err(|e| StoreError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self {
            client,
            public_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn builder(timeout: Duration) -> ClientBuilder {
        ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("s3store/", env!("CARGO_PKG_VERSION")))
    }

    fn auth_headers(auth: &AuthConfig) -> RemoteResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &auth.token {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token), "auth token")?);
        } else if let (Some(key), Some(secret)) = (&auth.access_key, &auth.secret_key) {
            use base64::{engine::general_purpose, Engine as _};
            let encoded = general_purpose::STANDARD.encode(format!("{}:{}", key, secret));
            headers.insert(AUTHORIZATION, header_value(&format!("Basic {}", encoded), "credentials")?);
        }

        if let Some(session_token) = &auth.session_token {
            headers.insert("x-amz-security-token", header_value(session_token, "session token")?);
        }

        Ok(headers)
    }

    /// Full URL of an object path
    fn object_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder, action: &str) -> RemoteResult<ObjectResponse> {
        let response = request.send().await.map_err(|e| {
            StoreError::network(format!("Failed to {}: {}", action, e), e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            StoreError::network(format!("Failed to read response to {}: {}", action, e), e)
        })?;

        Ok(ObjectResponse::new(status, body.to_vec()))
    }
}

fn header_value(value: &str, what: &str) -> RemoteResult<HeaderValue> {
    value.parse().map_err(|e| StoreError::Network {
        message: format!("Invalid {}: {}", what, e),
        source: Some(Box::new(e)),
    })
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(
        &self,
        path: &str,
        body: Vec<u8>,
        options: &PutOptions,
    ) -> RemoteResult<ObjectResponse> {
        let url = self.object_url(path);
        debug!(url = %url, bytes = body.len(), "PUT object");

        let mut request = self.client.put(&url).body(body);
        if let Some(acl) = &options.acl {
            request = request.header("x-amz-acl", acl);
        }
        if let Some(content_type) = &options.content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        Self::send(request, "upload object").await
    }

    async fn delete_object(&self, path: &str) -> RemoteResult<ObjectResponse> {
        let url = self.object_url(path);
        debug!(url = %url, "DELETE object");

        Self::send(self.client.delete(&url), "delete object").await
    }

    async fn fetch(&self, url: &str) -> RemoteResult<ObjectResponse> {
        debug!(url, "GET object");

        Self::send(self.public_client.get(url), "fetch object").await
    }
}

#[cfg(test)]
mod tests;
