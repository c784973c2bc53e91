//! Unit tests for CLI commands.

use super::*;

use s3store_core::types::CacheValue;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test command context reading `s3store.toml` from a temporary directory
async fn create_test_context(temp_dir: &TempDir, config: &str) -> CommandContext {
    let cwd = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
    let config_path = cwd.join("s3store.toml");
    tokio::fs::write(&config_path, config).await.unwrap();

    CommandContext {
        cwd,
        output: crate::output::OutputHandler::new(),
        config_path: Some(config_path),
        cli_overrides: HashMap::new(),
    }
}

fn config_for(server: &MockServer, temp_dir: &TempDir) -> String {
    format!(
        "path = \"{}\"\n\n[s3]\nendpoint = \"{}\"\npublic_url = \"{}\"\n",
        temp_dir.path().join("cache").display(),
        server.uri(),
        server.uri()
    )
}

#[test]
fn test_parse_overrides() {
    let overrides = parse_overrides(&[
        "s3.root=shop".to_string(),
        "site=a=b".to_string(),
    ])
    .unwrap();

    assert_eq!(overrides.get("s3.root").map(String::as_str), Some("shop"));
    assert_eq!(overrides.get("site").map(String::as_str), Some("a=b"));

    assert!(parse_overrides(&["s3.root".to_string()]).is_err());
    assert!(parse_overrides(&["=value".to_string()]).is_err());
}

#[test]
fn test_parse_value() {
    assert_eq!(entry::parse_value("42", false), CacheValue::from(42i64));
    assert_eq!(entry::parse_value("42", true), CacheValue::from("42"));
    assert_eq!(entry::parse_value("hello", false), CacheValue::from("hello"));
    assert_eq!(
        entry::parse_value(r#"{"type":"Buffer","data":[7]}"#, false),
        CacheValue::Bytes(vec![7])
    );
}

#[test]
fn test_render_value() {
    let rendered = entry::render_value(&CacheValue::Bytes(vec![1, 2])).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed, serde_json::json!({"type": "Buffer", "data": [1, 2]}));
}

#[tokio::test]
async fn test_encode_and_decode_commands() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, "").await;

    assert!(key::encode("user:42", Some("example.com".to_string()), &ctx).await.is_ok());
    assert!(key::decode("dXNlcjo0Mg", &ctx).is_ok());
    assert!(matches!(
        key::decode("not base64!", &ctx),
        Err(StoreError::Codec { .. })
    ));
}

#[tokio::test]
async fn test_encode_defaults_to_configured_site() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut ctx = create_test_context(&temp_dir, "site = \"example.com/\"\n").await;

    let token = key::encoded_key("example.com/user:42", None, &ctx).await.unwrap();
    assert_eq!(token, "dXNlcjo0Mg");

    // --site wins over the configuration
    let token = key::encoded_key("shop/user:42", Some("shop/".to_string()), &ctx).await.unwrap();
    assert_eq!(token, "dXNlcjo0Mg");

    ctx.cli_overrides = parse_overrides(&["site=other/".to_string()]).unwrap();
    let token = key::encoded_key("other/user:42", None, &ctx).await.unwrap();
    assert_eq!(token, "dXNlcjo0Mg");
}

#[tokio::test]
async fn test_check_valid_config() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &config_for(&mock_server, &temp_dir)).await;

    assert!(dispatch_command(Commands::Check, &ctx).await.is_ok());
    assert!(temp_dir.path().join("cache").is_dir());
}

#[tokio::test]
async fn test_check_rejects_incomplete_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, "[s3]\nbucket = \"assets\"\n").await;

    match dispatch_command(Commands::Check, &ctx).await {
        Err(StoreError::ConfigValidation { field, .. }) => assert_eq!(field, "s3.public_url"),
        other => panic!("Expected ConfigValidation error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_cli_overrides_apply() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut ctx = create_test_context(&temp_dir, "[s3]\nbucket = \"assets\"\n").await;
    ctx.cli_overrides = parse_overrides(&[
        "s3.public_url=https://cdn.example.com".to_string(),
        "tryget=off".to_string(),
    ])
    .unwrap();

    let (options, source) = ctx.load_options().await.unwrap();
    assert_eq!(options.s3.public_url.as_deref(), Some("https://cdn.example.com"));
    assert!(!options.tryget);
    assert!(matches!(source, ConfigSource::Explicit(_)));
}

#[tokio::test]
async fn test_entry_commands_round_trip() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &config_for(&mock_server, &temp_dir)).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    entry::set("user:42", r#"{"name":"a"}"#, false, &ctx).await.unwrap();

    let uploaded = mock_server.received_requests().await.unwrap()[0].body.clone();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(uploaded))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    // every command opens a fresh store and finds the entry through try-get
    entry::get("user:42", &ctx).await.unwrap();
    entry::keys(&["user:42".to_string()], &ctx).await.unwrap();
    entry::del("user:42", &ctx).await.unwrap();
}

#[tokio::test]
async fn test_set_refuses_null() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &config_for(&mock_server, &temp_dir)).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    entry::set("k", "null", false, &ctx).await.unwrap();
}

#[tokio::test]
async fn test_del_of_missing_key_sends_no_delete() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir, &config_for(&mock_server, &temp_dir)).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    entry::del("missing", &ctx).await.unwrap();
}

#[tokio::test]
async fn test_del_without_tryget_deletes_derived_object() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let config = format!("tryget = false\n{}", config_for(&mock_server, &temp_dir));
    let ctx = create_test_context(&temp_dir, &config).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    entry::del("user:42", &ctx).await.unwrap();
}
