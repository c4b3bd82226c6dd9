//! Media library index: lists stored assets per category for the admin
//! console and audits entity references against storage.

pub mod audit;

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde::Serialize;
use tracing::{debug, warn};

use mediahub_core::result::AppResult;
use mediahub_core::types::{AssetPath, RawEntry};
use mediahub_storage::StorageGateway;

use crate::registry::{AssetCategory, BucketRegistry};

pub use audit::{AuditReport, MissingAsset, ReferenceRecord, UnrecognizedReference};

/// Zero-byte objects that only exist to keep an otherwise empty folder.
pub const PLACEHOLDER_NAMES: [&str; 3] = [".emptyFolderPlaceholder", ".keep", ".gitkeep"];

/// Upper bound on entries read from a single folder.
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// One folder of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSource {
    /// Category whose bucket and folder prefix apply.
    pub category: AssetCategory,
    /// Folder relative to the category's folder prefix.
    pub folder: String,
}

impl MediaSource {
    /// The category's own folder.
    pub fn category(category: AssetCategory) -> Self {
        Self {
            category,
            folder: String::new(),
        }
    }

    /// A sub-folder of the category's folder.
    pub fn folder(category: AssetCategory, folder: impl Into<String>) -> Self {
        Self {
            category,
            folder: folder.into(),
        }
    }
}

/// A stored asset as shown in the media library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetView {
    /// Category the asset was listed under.
    pub category: AssetCategory,
    /// Bucket holding the asset.
    pub bucket: String,
    /// Full object key.
    pub path: AssetPath,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Creation time, when the store reports one.
    pub created_at: Option<DateTime<Utc>>,
    /// Content type, when the store reports one.
    pub mime_type: Option<String>,
    /// Canonical public URL.
    pub public_url: String,
}

/// Read-only view over the buckets of the registry.
#[derive(Debug, Clone)]
pub struct MediaIndex {
    registry: Arc<BucketRegistry>,
    gateway: StorageGateway,
    max_entries: usize,
}

/// Whether a listing entry is a real asset.
pub fn is_listable(entry: &RawEntry) -> bool {
    entry.size_bytes > 0 && !entry.is_folder && !PLACEHOLDER_NAMES.contains(&entry.name.as_str())
}

impl MediaIndex {
    /// Creates a new media index.
    pub fn new(registry: Arc<BucketRegistry>, gateway: StorageGateway) -> Self {
        Self {
            registry,
            gateway,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Override the per-folder entry bound.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Assets directly inside `folder` of `category`.
    ///
    /// At most the configured entry bound is read; a folder that reaches it
    /// is logged as possibly truncated.
    pub async fn list_assets(
        &self,
        category: AssetCategory,
        folder: &str,
    ) -> AppResult<Vec<AssetView>> {
        Ok(self.list_bounded(category, folder).await?.0)
    }

    /// Listed assets plus whether the entry bound was reached.
    async fn list_bounded(
        &self,
        category: AssetCategory,
        folder: &str,
    ) -> AppResult<(Vec<AssetView>, bool)> {
        let descriptor = self.registry.describe(category);
        let folder = descriptor.folder_path(folder)?;
        let resolver = self.gateway.resolver();

        let entries: Vec<RawEntry> = self
            .gateway
            .list(&descriptor.bucket, &folder, self.max_entries)?
            .try_collect()
            .await?;
        let listed = entries.len();
        let truncated = listed >= self.max_entries;
        if truncated {
            warn!(
                category = %category,
                bucket = %descriptor.bucket,
                folder = %folder,
                max_entries = self.max_entries,
                "Listing reached the entry bound; later entries were not read"
            );
        }

        let mut views = Vec::new();
        for entry in entries.into_iter().filter(is_listable) {
            let Ok(path) = AssetPath::join(&folder, &entry.name) else {
                warn!(bucket = %descriptor.bucket, name = %entry.name, "Skipping entry with unusable name");
                continue;
            };
            views.push(AssetView {
                category,
                bucket: descriptor.bucket.clone(),
                public_url: resolver.to_public_url(&descriptor.bucket, &path),
                path,
                name: entry.name,
                size_bytes: entry.size_bytes,
                created_at: entry.created_at,
                mime_type: entry.mime_type,
            });
        }

        debug!(
            category = %category,
            bucket = %descriptor.bucket,
            folder = %folder,
            listed,
            kept = views.len(),
            "Listed media assets"
        );
        Ok((views, truncated))
    }

    /// Assets from several sources, newest first.
    pub async fn list_many(&self, sources: &[MediaSource]) -> AppResult<Vec<AssetView>> {
        let mut views = Vec::new();
        for source in sources {
            views.extend(self.list_assets(source.category, &source.folder).await?);
        }
        views.sort_by(newest_first);
        Ok(views)
    }

    /// Every category's own folder, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<AssetView>> {
        let sources: Vec<MediaSource> = AssetCategory::ALL
            .into_iter()
            .map(MediaSource::category)
            .collect();
        self.list_many(&sources).await
    }
}

/// `created_at` descending, undated entries last, ties by name.
fn newest_first(a: &AssetView, b: &AssetView) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.name.cmp(&b.name))
}
