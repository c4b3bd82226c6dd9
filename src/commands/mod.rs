//! CLI command definitions and dispatch.

pub mod audit;
pub mod buckets;
pub mod list;
pub mod resolve;
pub mod upload;
pub mod url;

use clap::{Parser, Subcommand};

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;

use crate::output::OutputFormat;

/// MediaHub: media asset storage and reference maintenance
#[derive(Debug, Parser)]
#[command(name = "mediahub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the bucket registry
    Buckets,
    /// List media library assets
    List(list::ListArgs),
    /// Upload a file and set an entity reference field
    Upload(upload::UploadArgs),
    /// Print the public URL of a stored path
    Url(url::UrlArgs),
    /// Parse a public URL into bucket and path
    Parse(url::ParseArgs),
    /// Resolve an entity reference field with a fallback
    Resolve(resolve::ResolveArgs),
    /// Audit reference fields against storage
    Audit(audit::AuditArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Buckets => buckets::execute(&config, self.format),
            Commands::List(args) => list::execute(args, config, self.format).await,
            Commands::Upload(args) => upload::execute(args, config, self.format).await,
            Commands::Url(args) => url::execute_url(args, &config),
            Commands::Parse(args) => url::execute_parse(args, &config, self.format),
            Commands::Resolve(args) => resolve::execute(args, config).await,
            Commands::Audit(args) => audit::execute(args, config, self.format).await,
        }
    }
}

/// Load and validate configuration. `MEDIAHUB_ENV` selects the overlay
/// file under `config/`.
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("MEDIAHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}
