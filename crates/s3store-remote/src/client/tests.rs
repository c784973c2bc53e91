//! Unit tests for the object store client

use super::*;

use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        endpoint: Some(server.uri()),
        bucket: Some("cache-bucket".to_string()),
        ..ClientConfig::default()
    }
}

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();
    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(!config.path_style);
    assert!(config.endpoint.is_none());
}

#[test]
fn test_base_url_virtual_hosted() {
    let config = ClientConfig {
        bucket: Some("assets".to_string()),
        region: "eu-west-1".to_string(),
        ..ClientConfig::default()
    };
    assert_eq!(
        config.base_url().unwrap(),
        "https://assets.s3.eu-west-1.amazonaws.com"
    );
}

#[test]
fn test_base_url_path_style() {
    let config = ClientConfig {
        endpoint: Some("http://localhost:9000/".to_string()),
        bucket: Some("assets".to_string()),
        path_style: true,
        ..ClientConfig::default()
    };
    assert_eq!(config.base_url().unwrap(), "http://localhost:9000/assets");
}

#[test]
fn test_base_url_requires_bucket_or_endpoint() {
    let result = ClientConfig::default().base_url();
    match result {
        Err(StoreError::ConfigValidation { field, .. }) => assert_eq!(field, "s3.bucket"),
        other => panic!("Expected ConfigValidation error, got {:?}", other),
    }
}

#[test]
fn test_base_url_rejects_invalid_endpoint() {
    let config = ClientConfig {
        endpoint: Some("not a url".to_string()),
        ..ClientConfig::default()
    };
    assert!(config.base_url().is_err());
}

#[tokio::test]
async fn test_put_object_sends_acl_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/cache/cache_aw.dat"))
        .and(header("x-amz-acl", "public-read"))
        .and(header("content-type", "application/json"))
        .and(body_bytes(b"{\"key\":\"k\"}".to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = HttpObjectStore::new(config_for(&mock_server)).unwrap();
    let response = store
        .put_object(
            "/cache/cache_aw.dat",
            b"{\"key\":\"k\"}".to_vec(),
            &PutOptions::public_json(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
}

#[tokio::test]
async fn test_put_object_reports_rejection_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<Error>AccessDenied</Error>"))
        .mount(&mock_server)
        .await;

    let store = HttpObjectStore::new(config_for(&mock_server)).unwrap();
    let response = store
        .put_object("/x.dat", vec![], &PutOptions::default())
        .await
        .unwrap();

    assert_eq!(response.status, 403);
    assert_eq!(response.body, b"<Error>AccessDenied</Error>".to_vec());
}

#[tokio::test]
async fn test_basic_auth_credentials() {
    let mock_server = MockServer::start().await;

    use base64::{engine::general_purpose, Engine as _};
    let expected = format!("Basic {}", general_purpose::STANDARD.encode("AKID:secret"));

    Mock::given(method("DELETE"))
        .and(path("/cache/cache_aw.dat"))
        .and(header("authorization", expected.as_str()))
        .and(header("x-amz-security-token", "session"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.auth = AuthConfig {
        token: None,
        access_key: Some("AKID".to_string()),
        secret_key: Some("secret".to_string()),
        session_token: Some("session".to_string()),
    };

    let store = HttpObjectStore::new(config).unwrap();
    let response = store.delete_object("/cache/cache_aw.dat").await.unwrap();
    assert_eq!(response.status, 204);
    assert!(response.is_success());
}

#[tokio::test]
async fn test_bearer_token_takes_precedence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.auth = AuthConfig {
        token: Some("test-token".to_string()),
        access_key: Some("AKID".to_string()),
        secret_key: Some("secret".to_string()),
        session_token: None,
    };

    let store = HttpObjectStore::new(config).unwrap();
    store.delete_object("/a.dat").await.unwrap();
}

#[tokio::test]
async fn test_fetch_does_not_send_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public/cache_aw.dat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"value\":1}"))
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.auth.token = Some("secret-token".to_string());

    let store = HttpObjectStore::new(config).unwrap();
    let url = format!("{}/public/cache_aw.dat", mock_server.uri());
    let response = store.fetch(&url).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"{\"value\":1}".to_vec());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .headers
        .iter()
        .all(|(name, _)| name.as_str() != "authorization"));
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    // nothing listens on the discard port
    let config = ClientConfig {
        endpoint: Some("http://127.0.0.1:9".to_string()),
        timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    };

    let store = HttpObjectStore::new(config).unwrap();
    let result = store.delete_object("/a.dat").await;
    assert!(matches!(result, Err(StoreError::Network { .. })));
}
