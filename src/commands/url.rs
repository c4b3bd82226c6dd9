//! Public URL helpers.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;
use mediahub_core::types::AssetPath;

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the url command
#[derive(Debug, Args)]
pub struct UrlArgs {
    /// Bucket name
    #[arg(long)]
    pub bucket: String,

    /// Object path (normalized before use)
    #[arg(long)]
    pub path: String,
}

/// Arguments for the parse command
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Public URL to parse
    pub url: String,
}

/// Parsed URL display row
#[derive(Debug, Serialize, Tabled)]
struct ParsedRow {
    /// Resolution
    kind: String,
    /// Bucket
    bucket: String,
    /// Object path
    path: String,
    /// Canonical URL on the current host
    canonical_url: String,
}

/// Print the canonical public URL of a path.
pub fn execute_url(args: &UrlArgs, config: &AppConfig) -> Result<(), AppError> {
    let path = AssetPath::parse(&args.path)?;
    println!("{}", AppContext::resolver(config).to_public_url(&args.bucket, &path));
    Ok(())
}

/// Parse a public URL, reporting whether it is on the current or a legacy
/// host.
pub fn execute_parse(args: &ParseArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let resolver = AppContext::resolver(config);
    let (bucket, path) = resolver.from_public_url(&args.url)?;
    let locator = resolver.classify(Some(&args.url));
    let kind = match locator {
        mediahub_storage::AssetLocator::Legacy { .. } => "legacy",
        _ => "canonical",
    };
    let row = ParsedRow {
        kind: kind.to_string(),
        canonical_url: resolver.to_public_url(&bucket, &path),
        bucket,
        path: path.to_string(),
    };
    output::print_list(&[row], format);
    Ok(())
}
