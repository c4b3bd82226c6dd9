//! Bucket registry: the logical asset categories and the storage bucket,
//! folder and upload constraints behind each of them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mediahub_core::config::{BucketOverride, validate_bucket_name};
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::types::normalize_path;
use mediahub_storage::mime::essence;

/// One mebibyte.
const MB: u64 = 1024 * 1024;

const IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];
const DOCUMENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Logical asset categories known to the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetCategory {
    /// Shared images used across pages.
    GeneralImages,
    /// Downloadable documents (data sheets, brochures).
    Documents,
    /// Product photos.
    ProductImages,
    /// The company logo.
    CompanyLogo,
    /// The landing page hero image.
    CompanyHero,
}

impl AssetCategory {
    /// Every category, in registry order.
    pub const ALL: [AssetCategory; 5] = [
        Self::GeneralImages,
        Self::Documents,
        Self::ProductImages,
        Self::CompanyLogo,
        Self::CompanyHero,
    ];

    /// Kebab-case name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralImages => "general-images",
            Self::Documents => "documents",
            Self::ProductImages => "product-images",
            Self::CompanyLogo => "company-logo",
            Self::CompanyHero => "company-hero",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::unknown_category(wanted))
    }
}

/// Where a category's assets live and what may be uploaded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketDescriptor {
    /// Category this descriptor belongs to.
    pub category: AssetCategory,
    /// Storage bucket name.
    pub bucket: String,
    /// Whether objects are publicly readable.
    pub public: bool,
    /// Maximum accepted file size in bytes.
    pub max_size_bytes: u64,
    /// Accepted MIME types (lower-case, no parameters).
    pub allowed_mime_types: BTreeSet<String>,
    /// Folder inside the bucket; `None` is the bucket root.
    pub folder_prefix: Option<String>,
}

impl BucketDescriptor {
    fn new(
        category: AssetCategory,
        bucket: &str,
        folder_prefix: Option<&str>,
        max_size_bytes: u64,
        allowed: &[&str],
    ) -> Self {
        Self {
            category,
            bucket: bucket.to_string(),
            public: true,
            max_size_bytes,
            allowed_mime_types: allowed.iter().map(|m| m.to_string()).collect(),
            folder_prefix: folder_prefix.map(str::to_string),
        }
    }

    /// Resolve `folder` relative to the folder prefix.
    pub fn folder_path(&self, folder: &str) -> AppResult<String> {
        let sub = normalize_path(folder)?;
        Ok(match (self.folder_prefix.as_deref(), sub.is_empty()) {
            (None, _) => sub,
            (Some(prefix), true) => prefix.to_string(),
            (Some(prefix), false) => format!("{prefix}/{sub}"),
        })
    }

    fn apply(&mut self, entry: &BucketOverride) -> AppResult<()> {
        if let Some(bucket) = &entry.bucket {
            self.bucket = bucket.clone();
        }
        if let Some(prefix) = &entry.folder_prefix {
            let prefix = normalize_path(prefix)?;
            self.folder_prefix = (!prefix.is_empty()).then_some(prefix);
        }
        if let Some(max) = entry.max_size_bytes {
            self.max_size_bytes = max;
        }
        if let Some(types) = &entry.allowed_mime_types {
            self.allowed_mime_types = types
                .iter()
                .map(|t| essence(t))
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(public) = entry.public {
            self.public = public;
        }
        Ok(())
    }
}

/// Immutable table of category descriptors, built once at startup.
#[derive(Debug, Clone)]
pub struct BucketRegistry {
    /// Indexed by [`AssetCategory::index`].
    entries: Vec<BucketDescriptor>,
}

impl Default for BucketRegistry {
    fn default() -> Self {
        use AssetCategory::*;
        Self {
            entries: vec![
                BucketDescriptor::new(GeneralImages, "images", None, 10 * MB, &IMAGE_TYPES),
                BucketDescriptor::new(Documents, "documents", None, 5 * MB, &DOCUMENT_TYPES),
                BucketDescriptor::new(
                    ProductImages,
                    "product-images",
                    None,
                    10 * MB,
                    &IMAGE_TYPES,
                ),
                BucketDescriptor::new(CompanyLogo, "company", Some("logos"), 10 * MB, &IMAGE_TYPES),
                BucketDescriptor::new(
                    CompanyHero,
                    "company",
                    Some("hero-images"),
                    10 * MB,
                    &IMAGE_TYPES,
                ),
            ],
        }
    }
}

impl BucketRegistry {
    /// Build the default table with per-category overrides applied.
    pub fn from_overrides(overrides: &BTreeMap<String, BucketOverride>) -> AppResult<Self> {
        let mut registry = Self::default();
        for (name, entry) in overrides {
            let category: AssetCategory = name.parse().map_err(|_| {
                AppError::configuration(format!("buckets.{name}: unknown asset category"))
            })?;
            entry.validate(name)?;
            let descriptor = &mut registry.entries[category.index()];
            descriptor.apply(entry)?;
            validate_bucket_name(&descriptor.bucket)?;
            tracing::debug!(category = %category, bucket = %descriptor.bucket, "Applied bucket override");
        }
        Ok(registry)
    }

    /// Descriptor for a category.
    pub fn describe(&self, category: AssetCategory) -> &BucketDescriptor {
        &self.entries[category.index()]
    }

    /// Descriptor for a category given by name.
    pub fn describe_name(&self, name: &str) -> AppResult<&BucketDescriptor> {
        let category: AssetCategory = name.parse()?;
        Ok(self.describe(category))
    }

    /// All descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &BucketDescriptor> {
        self.entries.iter()
    }

    /// Check a candidate file against the category's constraints.
    pub fn validate(&self, category: AssetCategory, size_bytes: u64, mime_type: &str) -> AppResult<()> {
        let descriptor = self.describe(category);
        if size_bytes == 0 {
            return Err(AppError::validation(format!(
                "File is empty; {category} uploads must contain data"
            )));
        }
        if size_bytes > descriptor.max_size_bytes {
            return Err(AppError::validation(format!(
                "File size {size_bytes} bytes exceeds the {category} limit of {} bytes ({} MB)",
                descriptor.max_size_bytes,
                descriptor.max_size_bytes / MB
            )));
        }
        let mime = essence(mime_type);
        if !descriptor.allowed_mime_types.contains(&mime) {
            return Err(AppError::validation(format!(
                "MIME type '{mime}' is not accepted for {category}; allowed: {}",
                descriptor
                    .allowed_mime_types
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediahub_core::error::ErrorKind;

    #[test]
    fn test_default_table() {
        let registry = BucketRegistry::default();
        let logo = registry.describe(AssetCategory::CompanyLogo);
        assert_eq!(logo.bucket, "company");
        assert_eq!(logo.folder_prefix.as_deref(), Some("logos"));
        assert_eq!(logo.max_size_bytes, 10 * 1024 * 1024);

        let docs = registry.describe_name("documents").unwrap();
        assert_eq!(docs.max_size_bytes, 5 * 1024 * 1024);
        assert!(docs.allowed_mime_types.contains("application/pdf"));
        assert!(docs.folder_prefix.is_none());

        for category in AssetCategory::ALL {
            assert_eq!(registry.describe(category).category, category);
        }
    }

    #[test]
    fn test_unknown_category() {
        let err = BucketRegistry::default().describe_name("avatars").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCategory);
        assert_eq!("Company-Hero".parse::<AssetCategory>().unwrap(), AssetCategory::CompanyHero);
    }

    #[test]
    fn test_validate_constraints() {
        let registry = BucketRegistry::default();
        let logo = AssetCategory::CompanyLogo;

        assert!(registry.validate(logo, 200 * 1024, "image/png").is_ok());
        assert!(registry.validate(logo, 10 * MB, "IMAGE/PNG; charset=binary").is_ok());

        let oversized = registry.validate(logo, 12 * MB, "image/png").unwrap_err();
        assert_eq!(oversized.kind, ErrorKind::Validation);
        assert!(oversized.message.contains("exceeds"));

        let empty = registry.validate(logo, 0, "image/png").unwrap_err();
        assert!(empty.message.contains("empty"));

        let wrong_type = registry
            .validate(AssetCategory::Documents, 1024, "image/png")
            .unwrap_err();
        assert!(wrong_type.message.contains("image/png"));
    }

    #[test]
    fn test_folder_path() {
        let registry = BucketRegistry::default();
        let hero = registry.describe(AssetCategory::CompanyHero);
        assert_eq!(hero.folder_path("").unwrap(), "hero-images");
        assert_eq!(hero.folder_path("/2024/").unwrap(), "hero-images/2024");
        assert!(hero.folder_path("../logos").is_err());

        let images = registry.describe(AssetCategory::GeneralImages);
        assert_eq!(images.folder_path("").unwrap(), "");
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "company-logo".to_string(),
            BucketOverride {
                bucket: Some("brand".into()),
                folder_prefix: Some("/".into()),
                allowed_mime_types: Some(vec!["image/svg+xml".into()]),
                ..Default::default()
            },
        );
        let registry = BucketRegistry::from_overrides(&overrides).unwrap();
        let logo = registry.describe(AssetCategory::CompanyLogo);
        assert_eq!(logo.bucket, "brand");
        assert!(logo.folder_prefix.is_none());
        assert!(registry.validate(AssetCategory::CompanyLogo, 10, "image/svg+xml").is_ok());
        assert!(registry.validate(AssetCategory::CompanyLogo, 10, "image/png").is_err());

        let mut unknown = BTreeMap::new();
        unknown.insert("avatars".to_string(), BucketOverride::default());
        assert!(BucketRegistry::from_overrides(&unknown).is_err());
    }
}
