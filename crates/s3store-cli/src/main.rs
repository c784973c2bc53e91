//! # s3store-cli
//!
//! Command-line access to an s3store cache bucket.
//!
//! This is the main entry point for the `s3store` tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use s3store_core::error::{StoreError, StoreResult};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Stage cache entries locally and serve them from an S3-compatible bucket
#[derive(Parser)]
#[command(name = "s3store", version, about = "S3-backed cache store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the nearest s3store.toml or s3store.json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override a configuration field, e.g. `-o s3.root=shop`
    #[arg(short = 'o', long = "option", global = true, value_name = "FIELD=VALUE")]
    pub options: Vec<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a value
    Set {
        key: String,
        /// JSON value; anything that is not JSON is stored as a string
        value: String,
        /// Store the value as a string even if it parses as JSON
        #[arg(long)]
        raw: bool,
    },
    /// Read a value
    Get { key: String },
    /// Delete a value
    Del { key: String },
    /// Resolve keys through the bucket and list the ones present
    Keys { keys: Vec<String> },
    /// Print the object token of a key
    Encode {
        key: String,
        #[arg(long)]
        site: Option<String>,
    },
    /// Print the key of an object token
    Decode { token: String },
    /// Check configuration
    Check,
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting s3store v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> StoreResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| StoreError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config, &cli.options)?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "s3store={level},s3store_backend={level},s3store_remote={level},s3store_cache={level},s3store_config={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("s3store encountered an unexpected error: {}", panic_info);
        eprintln!("s3store crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
