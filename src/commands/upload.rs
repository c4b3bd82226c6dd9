//! File upload command.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use mediahub_core::config::AppConfig;
use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::types::OwnerRef;
use mediahub_service::{AssetCategory, UploadError, UploadFile};
use mediahub_storage::mime::mime_from_path;

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Asset category (e.g. company-logo)
    #[arg(long)]
    pub category: String,

    /// Path to the file to upload
    #[arg(long)]
    pub file: PathBuf,

    /// Table of the record that owns the reference field
    #[arg(long)]
    pub table: String,

    /// Primary key of the owning record
    #[arg(long)]
    pub owner: String,

    /// Reference field to set
    #[arg(long)]
    pub field: String,

    /// Content type; guessed from the file name when omitted
    #[arg(long)]
    pub mime: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let category: AssetCategory = args.category.parse()?;

    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let mime_type = match &args.mime {
        Some(m) => m.clone(),
        None => mime_from_path(&file_name)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Cannot guess the content type of '{file_name}'; pass --mime"
                ))
            })?
            .to_string(),
    };
    let content = tokio::fs::read(&args.file).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Failed to read file: {}", args.file.display()),
            e,
        )
    })?;

    let ctx = AppContext::build(config).await?;
    let owner = OwnerRef::new(&args.table, &args.owner);
    let file = UploadFile::new(file_name, mime_type, Bytes::from(content));

    match ctx.uploads().upload(category, file, &owner, &args.field).await {
        Ok(receipt) => {
            match format {
                OutputFormat::Json => output::print_json(&receipt),
                OutputFormat::Table => {
                    output::print_success(&format!("Uploaded and referenced from {owner}.{}", args.field));
                    output::print_kv("bucket", &receipt.reference.bucket);
                    output::print_kv("path", receipt.reference.path.as_str());
                    output::print_kv("size", &output::format_size(receipt.stored.size_bytes));
                    output::print_kv("url", &receipt.reference.public_url);
                }
            }
            Ok(())
        }
        Err(UploadError::Orphaned { orphan, cause }) => {
            output::print_warning("The file was stored but the reference field was not updated");
            match format {
                OutputFormat::Json => output::print_json(&orphan),
                OutputFormat::Table => {
                    output::print_kv("bucket", &orphan.bucket);
                    output::print_kv("path", orphan.path.as_str());
                    output::print_kv("url", &orphan.public_url);
                }
            }
            Err(cause)
        }
        Err(UploadError::Failed(err)) => Err(err),
    }
}
