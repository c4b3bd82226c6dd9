//! Bucket registry listing.

use serde::Serialize;
use tabled::Tabled;

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;
use mediahub_service::BucketRegistry;

use crate::output::{self, OutputFormat};

/// Registry display row
#[derive(Debug, Serialize, Tabled)]
struct BucketRow {
    /// Category
    category: String,
    /// Bucket
    bucket: String,
    /// Folder prefix
    folder: String,
    /// Maximum size
    max_size: String,
    /// Accepted types
    types: String,
    /// Publicly readable
    public: bool,
}

/// Print the registry, overrides applied.
pub fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let registry = BucketRegistry::from_overrides(&config.buckets)?;
    let rows: Vec<BucketRow> = registry
        .iter()
        .map(|d| BucketRow {
            category: d.category.to_string(),
            bucket: d.bucket.clone(),
            folder: d.folder_prefix.clone().unwrap_or_else(|| "(root)".to_string()),
            max_size: output::format_size(d.max_size_bytes),
            types: d
                .allowed_mime_types
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            public: d.public,
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
