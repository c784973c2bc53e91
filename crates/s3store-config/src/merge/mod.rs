//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use s3store_core::error::StoreError;
use tracing::debug;

use crate::options::{validate_options, StoreOptions};
use crate::ConfigResult;

/// Project configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 2] = ["s3store.toml", "s3store.json"];

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "S3STORE_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Project s3store.toml file
    ProjectToml(Utf8PathBuf),
    /// Project s3store.json file
    ProjectJson(Utf8PathBuf),
    /// File named on the command line
    Explicit(Utf8PathBuf),
    /// Built-in defaults
    Defaults,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load the base configuration.
    ///
    /// An explicit file wins, then the nearest project file, then the global
    /// file. Without any of them the built-in defaults are used.
    pub async fn load(&self, explicit: Option<&Utf8Path>) -> ConfigResult<(StoreOptions, ConfigSource)> {
        if let Some(path) = explicit {
            let options = load_file(path).await?;
            return Ok((options, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(found) = self.load_project_config().await? {
            return Ok(found);
        }

        if let Some(found) = self.load_global_config().await? {
            return Ok(found);
        }

        debug!("no configuration file found, using defaults");
        Ok((StoreOptions::default(), ConfigSource::Defaults))
    }

    /// Load project configuration, preferring s3store.toml over s3store.json
    pub async fn load_project_config(&self) -> ConfigResult<Option<(StoreOptions, ConfigSource)>> {
        let toml_path = self.resolve_config_path(CONFIG_FILES[0])?;
        if toml_path.exists() {
            let options = crate::toml::load_from_file(&toml_path).await?;
            return Ok(Some((options, ConfigSource::ProjectToml(toml_path))));
        }

        let json_path = self.resolve_config_path(CONFIG_FILES[1])?;
        if json_path.exists() {
            let options = crate::json::load_from_file(&json_path).await?;
            return Ok(Some((options, ConfigSource::ProjectJson(json_path))));
        }

        Ok(None)
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> ConfigResult<Utf8PathBuf> {
        let mut current = self.cwd.as_path();

        loop {
            let config_path = current.join(filename);
            if config_path.exists() {
                return Ok(config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // Return path in current directory even if it doesn't exist
        Ok(self.cwd.join(filename))
    }

    /// Location of the global configuration file
    pub fn global_config_path() -> ConfigResult<Utf8PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| StoreError::config("home_dir", "Could not determine home directory"))?;

        let home_dir = Utf8PathBuf::try_from(home_dir).map_err(|e| {
            StoreError::config("home_dir", format!("Invalid home directory path: {}", e))
        })?;

        Ok(home_dir.join(".s3store").join("config.toml"))
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(StoreOptions, ConfigSource)>> {
        let global_config_path = Self::global_config_path()?;

        if global_config_path.exists() {
            let options = crate::toml::load_from_file(&global_config_path).await?;
            Ok(Some((options, ConfigSource::Global(global_config_path))))
        } else {
            Ok(None)
        }
    }
}

/// Load a file, picking the parser from its extension
async fn load_file(path: &Utf8Path) -> ConfigResult<StoreOptions> {
    match path.extension() {
        Some("json") => crate::json::load_from_file(path).await,
        _ => crate::toml::load_from_file(path).await,
    }
}

impl ConfigLayering {
    /// Apply overrides to the base configuration and validate the result.
    ///
    /// Command-line overrides take precedence over environment overrides.
    pub fn merge_configs(
        base: StoreOptions,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<StoreOptions> {
        let merged = Self::apply_overrides(base, env_overrides, cli_overrides)?;

        validate_options(&merged)?;
        Ok(merged)
    }

    /// Apply overrides without validating, for callers that only read a few
    /// fields and must work with an incomplete configuration
    pub fn apply_overrides(
        base: StoreOptions,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<StoreOptions> {
        let mut merged = base;

        Self::apply_env_overrides(&mut merged, &env_overrides)?;
        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;
        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(options: &mut StoreOptions, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            let field = match key.as_str() {
                "S3STORE_PATH" => "path",
                "S3STORE_TRYGET" => "tryget",
                "S3STORE_SITE" => "site",
                "S3STORE_S3_KEY" => "s3.key",
                "S3STORE_S3_SECRET" => "s3.secret",
                "S3STORE_S3_TOKEN" => "s3.token",
                "S3STORE_S3_BEARER_TOKEN" => "s3.bearer_token",
                "S3STORE_S3_BUCKET" => "s3.bucket",
                "S3STORE_S3_REGION" => "s3.region",
                "S3STORE_S3_ENDPOINT" => "s3.endpoint",
                "S3STORE_S3_STYLE" => "s3.style",
                "S3STORE_S3_ROOT" => "s3.root",
                "S3STORE_S3_PUBLIC_URL" => "s3.public_url",
                "S3STORE_S3_TIMEOUT_SECS" => "s3.timeout_secs",
                _ => continue,
            };
            set_field(options, field, value, key)?;
        }

        Ok(())
    }

    /// Apply CLI flag overrides, keyed by field name
    fn apply_cli_overrides(options: &mut StoreOptions, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            set_field(options, key, value, key)?;
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn set_field(options: &mut StoreOptions, field: &str, value: &str, origin: &str) -> ConfigResult<()> {
    let text = || Some(value.to_string());

    match field {
        "path" => options.path = value.to_string(),
        "tryget" => options.tryget = parse_bool(value, origin)?,
        "site" => options.site = text(),
        "s3.key" => options.s3.key = text(),
        "s3.secret" => options.s3.secret = text(),
        "s3.token" => options.s3.token = text(),
        "s3.bearer_token" => options.s3.bearer_token = text(),
        "s3.bucket" => options.s3.bucket = text(),
        "s3.region" => options.s3.region = text(),
        "s3.endpoint" => options.s3.endpoint = text(),
        "s3.style" => options.s3.style = text(),
        "s3.root" => options.s3.root = text(),
        "s3.public_url" => options.s3.public_url = text(),
        "s3.timeout_secs" => {
            options.s3.timeout_secs = value.parse().map_err(|e| {
                StoreError::config(origin, format!("Invalid timeout '{}': {}", value, e))
            })?
        },
        _ => {
            return Err(StoreError::config(origin, "unknown configuration field"));
        },
    }

    Ok(())
}

fn parse_bool(value: &str, origin: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StoreError::config(
            origin,
            format!("expected a boolean, got '{}'", value),
        )),
    }
}
