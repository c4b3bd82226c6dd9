//! Reference audit: compares entity reference fields with what storage
//! actually holds. Reports only; nothing is deleted or rewritten.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use mediahub_core::result::AppResult;
use mediahub_core::traits::entity::EntityReader;
use mediahub_core::types::{AssetPath, OwnerRef};
use mediahub_storage::AssetLocator;

use super::{AssetView, MediaIndex, MediaSource, newest_first};

/// The stored value of one reference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRecord {
    /// Record owning the field.
    pub owner: OwnerRef,
    /// Field name.
    pub field: String,
    /// Stored value, `None` when null.
    pub value: Option<String>,
}

impl ReferenceRecord {
    /// Read the current value of `owner.field`.
    pub async fn read(reader: &dyn EntityReader, owner: OwnerRef, field: &str) -> AppResult<Self> {
        let value = reader.read_reference(&owner, field).await?;
        Ok(Self {
            owner,
            field: field.to_string(),
            value,
        })
    }
}

/// A reference pointing at an object that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAsset {
    /// Record owning the field.
    pub owner: OwnerRef,
    /// Field name.
    pub field: String,
    /// Bucket the reference points into.
    pub bucket: String,
    /// Object key the reference points at.
    pub path: AssetPath,
    /// Stored value.
    pub url: String,
}

/// A reference value that is not a recognized public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedReference {
    /// Record owning the field.
    pub owner: OwnerRef,
    /// Field name.
    pub field: String,
    /// Stored value.
    pub raw: String,
}

/// Findings of one audit run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// Number of reference values examined.
    pub checked: usize,
    /// Listed assets no examined reference points at.
    pub orphans: Vec<AssetView>,
    /// References whose object is gone.
    pub missing: Vec<MissingAsset>,
    /// References that do not parse as public URLs.
    pub unrecognized: Vec<UnrecognizedReference>,
    /// Sources whose listing reached the entry bound. Orphans beyond the
    /// bound are not reported.
    pub truncated: Vec<MediaSource>,
}

impl AuditReport {
    /// Whether the audit found nothing to reconcile. A truncated listing is
    /// never clean.
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty()
            && self.missing.is_empty()
            && self.unrecognized.is_empty()
            && self.truncated.is_empty()
    }
}

impl MediaIndex {
    /// Audit `references` against the assets listed from `sources`.
    ///
    /// Legacy-host references are checked against the current store under
    /// the same bucket and key.
    pub async fn audit(
        &self,
        references: &[ReferenceRecord],
        sources: &[MediaSource],
    ) -> AppResult<AuditReport> {
        let resolver = self.gateway.resolver();
        let mut report = AuditReport {
            checked: references.len(),
            ..Default::default()
        };
        let mut referenced: HashSet<(String, AssetPath)> = HashSet::new();

        for record in references {
            match resolver.classify(record.value.as_deref()) {
                AssetLocator::Canonical { bucket, path } | AssetLocator::Legacy { bucket, path } => {
                    if !self.gateway.exists(&bucket, &path).await? {
                        report.missing.push(MissingAsset {
                            owner: record.owner.clone(),
                            field: record.field.clone(),
                            bucket: bucket.clone(),
                            path: path.clone(),
                            url: record.value.clone().unwrap_or_default(),
                        });
                    }
                    referenced.insert((bucket, path));
                }
                AssetLocator::Unrecognized { raw } => {
                    report.unrecognized.push(UnrecognizedReference {
                        owner: record.owner.clone(),
                        field: record.field.clone(),
                        raw,
                    });
                }
                AssetLocator::Missing => {}
            }
        }

        for source in sources {
            let (views, truncated) = self.list_bounded(source.category, &source.folder).await?;
            if truncated {
                report.truncated.push(source.clone());
            }
            report.orphans.extend(
                views
                    .into_iter()
                    .filter(|view| !referenced.contains(&(view.bucket.clone(), view.path.clone()))),
            );
        }
        report.orphans.sort_by(newest_first);

        info!(
            checked = report.checked,
            orphans = report.orphans.len(),
            missing = report.missing.len(),
            unrecognized = report.unrecognized.len(),
            truncated = report.truncated.len(),
            "Reference audit finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use mediahub_storage::providers::memory::MemoryObjectStore;
    use mediahub_storage::{AssetResolver, StorageGateway};

    use crate::entity::MemoryEntityStore;
    use crate::registry::{AssetCategory, BucketRegistry};

    fn record(id: u32, field: &str, value: Option<&str>) -> ReferenceRecord {
        ReferenceRecord {
            owner: OwnerRef::new("company_info", id),
            field: field.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_audit_classifies_references() {
        let store = Arc::new(MemoryObjectStore::new());
        let now = Utc::now();
        store.insert("company", "logos/used.png", vec![1u8; 10], now).await;
        store.insert("company", "logos/stale.png", vec![1u8; 10], now).await;
        let gateway = StorageGateway::new(store, AssetResolver::new("host"));
        let index = MediaIndex::new(Arc::new(BucketRegistry::default()), gateway);

        let references = vec![
            record(1, "logo_url", Some("https://host/storage/v1/object/public/company/logos/used.png")),
            record(1, "hero_image_url", Some("https://host/storage/v1/object/public/company/hero-images/gone.jpg")),
            record(1, "brochure_url", Some("ftp://elsewhere/brochure.pdf")),
            record(1, "banner_url", None),
        ];
        let report = index
            .audit(&references, &[MediaSource::category(AssetCategory::CompanyLogo)])
            .await
            .unwrap();

        assert_eq!(report.checked, 4);
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].path.as_str(), "logos/stale.png");
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].path.as_str(), "hero-images/gone.jpg");
        assert_eq!(report.unrecognized.len(), 1);
        assert_eq!(report.unrecognized[0].field, "brochure_url");
        assert!(!report.is_clean());
        assert!(report.truncated.is_empty());
    }

    #[tokio::test]
    async fn test_audit_reports_truncated_listing() {
        let store = Arc::new(MemoryObjectStore::new());
        let now = Utc::now();
        for name in ["a.png", "b.png", "c.png"] {
            store.insert("images", name, vec![1u8; 10], now).await;
        }
        let gateway = StorageGateway::new(store, AssetResolver::new("host"));
        let index = MediaIndex::new(Arc::new(BucketRegistry::default()), gateway).with_max_entries(2);

        let source = MediaSource::category(AssetCategory::GeneralImages);
        let report = index.audit(&[], std::slice::from_ref(&source)).await.unwrap();
        assert_eq!(report.truncated, vec![source]);
        assert_eq!(report.orphans.len(), 2);
        assert!(!report.is_clean());

        let roomy = index.with_max_entries(10);
        let report = roomy
            .audit(&[], &[MediaSource::category(AssetCategory::GeneralImages)])
            .await
            .unwrap();
        assert!(report.truncated.is_empty());
        assert_eq!(report.orphans.len(), 3);
    }

    #[tokio::test]
    async fn test_reference_record_read() {
        let entities = MemoryEntityStore::new();
        let owner = OwnerRef::new("products", 42);
        entities.set_field(&owner, "image_url", Some("x")).await;

        let record = ReferenceRecord::read(&entities, owner.clone(), "image_url")
            .await
            .unwrap();
        assert_eq!(record.value.as_deref(), Some("x"));
        assert!(
            ReferenceRecord::read(&entities, OwnerRef::new("products", 1), "image_url")
                .await
                .is_err()
        );
    }
}
