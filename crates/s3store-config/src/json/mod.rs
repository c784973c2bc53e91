//! s3store.json parsing
//!
//! The JSON form mirrors how hosts usually hand options to a store factory:
//! either a bare options object or one wrapped as `{"options": {...}}`.

use camino::Utf8Path;
use s3store_core::error::StoreError;
use serde_json::Value;

use crate::options::StoreOptions;
use crate::ConfigResult;

/// Parse JSON string to store options
pub fn parse_options_json(content: &str) -> ConfigResult<StoreOptions> {
    let document: Value = serde_json::from_str(content).map_err(|e| parse_error(&e))?;

    let options = match document {
        Value::Object(mut fields) if fields.contains_key("options") => fields
            .remove("options")
            .unwrap_or(Value::Null),
        other => other,
    };

    if !options.is_object() {
        return Err(StoreError::ConfigParse {
            message: "JSON configuration must be an object".to_string(),
            line: 1,
            column: 1,
        });
    }

    serde_json::from_value(options).map_err(|e| StoreError::ConfigParse {
        message: format!("JSON parsing error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Serialize store options to pretty JSON
pub fn serialize_options_json(options: &StoreOptions) -> ConfigResult<String> {
    serde_json::to_string_pretty(options).map_err(|e| StoreError::ConfigParse {
        message: format!("JSON serialization error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Load and parse s3store.json from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<StoreOptions> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(format!("Failed to read {}", path), e))?;

    parse_options_json(&content).map_err(|e| match e {
        StoreError::ConfigParse {
            message,
            line,
            column,
        } => StoreError::ConfigParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        other => other,
    })
}

fn parse_error(e: &serde_json::Error) -> StoreError {
    StoreError::ConfigParse {
        message: format!("JSON syntax error: {}", e),
        line: e.line(),
        column: e.column(),
    }
}
