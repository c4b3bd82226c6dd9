//! Reference audit command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;
use mediahub_core::types::OwnerRef;
use mediahub_service::{AssetCategory, MediaSource, ReferenceRecord};

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for the audit command
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Reference field to check, as `table:id:field` (repeatable)
    #[arg(long = "ref", value_name = "TABLE:ID:FIELD", value_parser = parse_ref)]
    pub refs: Vec<(OwnerRef, String)>,

    /// Category whose assets are checked for orphans (default: all)
    #[arg(long)]
    pub category: Vec<String>,
}

/// Finding display row
#[derive(Debug, Serialize, Tabled)]
struct FindingRow {
    /// Finding
    finding: &'static str,
    /// Owner field, when a reference is involved
    reference: String,
    /// Object or raw value
    target: String,
}

fn parse_ref(raw: &str) -> Result<(OwnerRef, String), String> {
    let mut parts = raw.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(table), Some(id), Some(field))
            if !table.is_empty() && !id.is_empty() && !field.is_empty() =>
        {
            Ok((OwnerRef::new(table, id), field.to_string()))
        }
        _ => Err(format!("expected TABLE:ID:FIELD, got '{raw}'")),
    }
}

/// Execute the audit command
pub async fn execute(args: &AuditArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let sources = if args.category.is_empty() {
        AssetCategory::ALL.into_iter().map(MediaSource::category).collect()
    } else {
        args.category
            .iter()
            .map(|name| name.parse().map(MediaSource::category))
            .collect::<Result<Vec<_>, AppError>>()?
    };

    let ctx = AppContext::build(config).await?;
    let mut references = Vec::with_capacity(args.refs.len());
    for (owner, field) in &args.refs {
        references.push(ReferenceRecord::read(ctx.entities.reader.as_ref(), owner.clone(), field).await?);
    }

    let report = ctx.index().audit(&references, &sources).await?;

    if format == OutputFormat::Json {
        output::print_json(&report);
        return Ok(());
    }

    let mut rows = Vec::new();
    rows.extend(report.orphans.iter().map(|v| FindingRow {
        finding: "orphan",
        reference: "-".to_string(),
        target: format!("{}/{}", v.bucket, v.path),
    }));
    rows.extend(report.missing.iter().map(|m| FindingRow {
        finding: "missing",
        reference: format!("{}.{}", m.owner, m.field),
        target: format!("{}/{}", m.bucket, m.path),
    }));
    rows.extend(report.unrecognized.iter().map(|u| FindingRow {
        finding: "unrecognized",
        reference: format!("{}.{}", u.owner, u.field),
        target: u.raw.clone(),
    }));

    for source in &report.truncated {
        output::print_warning(&format!(
            "Listing of {} '{}' hit the entry bound; orphans beyond it were not checked",
            source.category, source.folder
        ));
    }

    if report.is_clean() {
        output::print_success(&format!("{} references checked, nothing to reconcile", report.checked));
    } else {
        output::print_list(&rows, format);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref() {
        let (owner, field) = parse_ref("company_info:1:logo_url").unwrap();
        assert_eq!(owner, OwnerRef::new("company_info", 1));
        assert_eq!(field, "logo_url");
        assert!(parse_ref("company_info:1").is_err());
        assert!(parse_ref("::logo_url").is_err());
    }
}
