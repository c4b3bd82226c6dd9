//! Reference resolution with fallback.

use clap::Args;

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;
use mediahub_core::types::OwnerRef;

use crate::context::AppContext;

/// Arguments for the resolve command
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Table of the owning record
    #[arg(long)]
    pub table: String,

    /// Primary key of the owning record
    #[arg(long)]
    pub owner: String,

    /// Reference field
    #[arg(long)]
    pub field: String,

    /// Value printed when the reference is missing or unusable
    #[arg(long)]
    pub fallback: String,
}

/// Print the URL the public site would display.
pub async fn execute(args: &ResolveArgs, config: AppConfig) -> Result<(), AppError> {
    let ctx = AppContext::build(config).await?;
    let owner = OwnerRef::new(&args.table, &args.owner);
    let url = ctx
        .references()
        .resolve_owner(ctx.entities.reader.as_ref(), &owner, &args.field, &args.fallback)
        .await;
    println!("{url}");
    Ok(())
}
