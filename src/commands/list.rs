//! Media library listing.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;
use mediahub_service::{AssetCategory, AssetView};

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Asset category (e.g. company-logo)
    #[arg(long, required_unless_present = "all")]
    pub category: Option<String>,

    /// Sub-folder inside the category's folder
    #[arg(long, default_value = "")]
    pub folder: String,

    /// Merge every category, newest first
    #[arg(long, conflicts_with_all = ["category", "folder"])]
    pub all: bool,
}

/// Asset display row
#[derive(Debug, Serialize, Tabled)]
struct AssetRow {
    /// Category
    category: String,
    /// Object path
    path: String,
    /// Size
    size: String,
    /// Created
    created: String,
    /// Public URL
    url: String,
}

impl From<&AssetView> for AssetRow {
    fn from(view: &AssetView) -> Self {
        Self {
            category: view.category.to_string(),
            path: format!("{}/{}", view.bucket, view.path),
            size: output::format_size(view.size_bytes),
            created: view
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            url: view.public_url.clone(),
        }
    }
}

/// Execute the list command
pub async fn execute(args: &ListArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ctx = AppContext::build(config).await?;
    let index = ctx.index();

    let views = match &args.category {
        Some(name) if !args.all => {
            let category: AssetCategory = name.parse()?;
            index.list_assets(category, &args.folder).await?
        }
        _ => index.list_all().await?,
    };

    match format {
        OutputFormat::Json => output::print_json(&views),
        OutputFormat::Table => {
            let rows: Vec<AssetRow> = views.iter().map(AssetRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
