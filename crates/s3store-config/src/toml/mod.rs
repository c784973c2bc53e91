//! s3store.toml parsing and serialization

use camino::Utf8Path;
use s3store_core::error::StoreError;

use crate::options::StoreOptions;
use crate::ConfigResult;

/// Parse TOML string to store options
pub fn parse_options_toml(content: &str) -> ConfigResult<StoreOptions> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        StoreError::ConfigParse {
            message: format!("TOML syntax error: {}", e.message()),
            line,
            column,
        }
    })?;

    // Then parse with serde for type safety
    toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        StoreError::ConfigParse {
            message: format!("TOML parsing error: {}", e.message()),
            line,
            column,
        }
    })
}

/// Serialize store options to TOML string
pub fn serialize_options_toml(options: &StoreOptions) -> ConfigResult<String> {
    toml::to_string_pretty(options).map_err(|e| StoreError::ConfigParse {
        message: format!("TOML serialization error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Load and parse s3store.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<StoreOptions> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(format!("Failed to read {}", path), e))?;

    parse_options_toml(&content).map_err(|e| match e {
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

/// One-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, column)
}
