//! Command implementations and dispatch logic.
//!
//! Each command is implemented as an async function that takes a CommandContext.
//! Commands touching the bucket build a fresh store from the layered
//! configuration, so the index only knows what the current invocation saw.

use std::collections::HashMap;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use s3store_backend::S3Store;
use s3store_config::{ConfigLayering, ConfigLoader, ConfigSource, StoreOptions};
use s3store_core::error::{StoreError, StoreResult};
use tracing::info;

pub mod entry;
pub mod key;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    /// Explicit configuration file
    pub config_path: Option<Utf8PathBuf>,
    /// `--option FIELD=VALUE` overrides
    pub cli_overrides: HashMap<String, String>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config_path: Option<PathBuf>, options: &[String]) -> StoreResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| StoreError::io("Failed to get current directory".to_string(), e))?;

        Ok(Self {
            cwd: utf8_path(cwd, "cwd")?,
            output: OutputHandler::new(),
            config_path: config_path.map(|p| utf8_path(p, "config")).transpose()?,
            cli_overrides: parse_overrides(options)?,
        })
    }

    /// Load the base configuration and apply environment and CLI overrides
    pub async fn load_options(&self) -> StoreResult<(StoreOptions, ConfigSource)> {
        let loader = ConfigLoader::new(self.cwd.clone());
        let (base, source) = loader.load(self.config_path.as_deref()).await?;

        let options = ConfigLayering::merge_configs(
            base,
            ConfigLayering::collect_env_overrides(),
            self.cli_overrides.clone(),
        )?;

        Ok((options, source))
    }

    /// Site of the layered configuration; an incomplete bucket section is fine
    pub async fn configured_site(&self) -> StoreResult<Option<String>> {
        let loader = ConfigLoader::new(self.cwd.clone());
        let (base, _) = loader.load(self.config_path.as_deref()).await?;

        let options = ConfigLayering::apply_overrides(
            base,
            ConfigLayering::collect_env_overrides(),
            self.cli_overrides.clone(),
        )?;
        Ok(options.site)
    }

    /// Build the store described by the layered configuration
    pub async fn open_store(&self) -> StoreResult<S3Store> {
        let (options, source) = self.load_options().await?;
        info!(source = ?source, "loaded configuration");
        S3Store::new(options)
    }
}

fn utf8_path(path: PathBuf, field: &str) -> StoreResult<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|p| StoreError::config(field, format!("path is not valid UTF-8: {}", p.display())))
}

/// Parse `FIELD=VALUE` pairs
pub fn parse_overrides(options: &[String]) -> StoreResult<HashMap<String, String>> {
    options
        .iter()
        .map(|option| {
            option
                .split_once('=')
                .map(|(field, value)| (field.trim().to_string(), value.to_string()))
                .filter(|(field, _)| !field.is_empty())
                .ok_or_else(|| {
                    StoreError::config(
                        "--option",
                        format!("expected FIELD=VALUE, got '{}'", option),
                    )
                })
        })
        .collect()
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> StoreResult<()> {
    match command {
        Commands::Set { key, value, raw } => entry::set(&key, &value, raw, ctx).await,
        Commands::Get { key } => entry::get(&key, ctx).await,
        Commands::Del { key } => entry::del(&key, ctx).await,
        Commands::Keys { keys } => entry::keys(&keys, ctx).await,
        Commands::Encode { key, site } => key::encode(&key, site, ctx).await,
        Commands::Decode { token } => key::decode(&token, ctx),
        Commands::Check => check_config(ctx).await,
        Commands::Version => show_version(ctx),
    }
}

async fn check_config(ctx: &CommandContext) -> StoreResult<()> {
    let (options, source) = ctx.load_options().await?;

    match &source {
        ConfigSource::Defaults => ctx.output.info("No configuration file found, using defaults"),
        ConfigSource::Global(path)
        | ConfigSource::ProjectToml(path)
        | ConfigSource::ProjectJson(path)
        | ConfigSource::Explicit(path) => ctx.output.info(&format!("Configuration: {}", path)),
    }

    // Building the store also validates the bucket endpoint
    let store = S3Store::new(options)?;
    let options = store.options();

    ctx.output.info(&format!("Staging directory: {}", options.path));
    ctx.output.info(&format!("Try-get: {}", options.tryget));
    if let Some(public_url) = &options.s3.public_url {
        ctx.output.info(&format!("Public URL: {}", public_url));
    }
    ctx.output.success("Configuration is valid");
    Ok(())
}

fn show_version(ctx: &CommandContext) -> StoreResult<()> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.info(&format!("s3store v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.info(&format!("Built: {}", env!("BUILD_DATE")));
    ctx.output.info(&format!("Target: {}", target));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}
