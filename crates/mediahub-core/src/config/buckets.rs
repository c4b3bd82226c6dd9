//! Per-category bucket overrides.
//!
//! The built-in category table lives in the bucket registry; this section
//! only lets an operator adjust individual entries.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::normalize_path;

const BUCKET_NAME_MIN_LEN: usize = 3;
const BUCKET_NAME_MAX_LEN: usize = 63;

/// Optional replacement values for one category's bucket descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketOverride {
    /// Bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Folder prefix inside the bucket; empty string means bucket root.
    #[serde(default)]
    pub folder_prefix: Option<String>,
    /// Maximum accepted file size in bytes.
    #[serde(default)]
    pub max_size_bytes: Option<u64>,
    /// Accepted MIME types.
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
    /// Whether objects are publicly readable.
    #[serde(default)]
    pub public: Option<bool>,
}

impl BucketOverride {
    /// Check every provided value.
    pub fn validate(&self, category: &str) -> AppResult<()> {
        if let Some(bucket) = &self.bucket {
            validate_bucket_name(bucket)?;
        }
        if let Some(prefix) = &self.folder_prefix {
            normalize_path(prefix)?;
        }
        if self.max_size_bytes == Some(0) {
            return Err(AppError::configuration(format!(
                "buckets.{category}.max_size_bytes must be greater than zero"
            )));
        }
        if let Some(types) = &self.allowed_mime_types {
            if types.iter().all(|t| t.trim().is_empty()) {
                return Err(AppError::configuration(format!(
                    "buckets.{category}.allowed_mime_types must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Validate a bucket name against S3-style naming rules: 3-63 characters of
/// lowercase letters, digits, dots and hyphens, starting and ending with a
/// letter or digit, without consecutive dots.
pub fn validate_bucket_name(name: &str) -> AppResult<()> {
    let invalid = |reason: &str| {
        Err(AppError::configuration(format!(
            "Invalid bucket name '{name}': {reason}"
        )))
    };

    if name.len() < BUCKET_NAME_MIN_LEN || name.len() > BUCKET_NAME_MAX_LEN {
        return invalid("must be between 3 and 63 characters");
    }
    if !name
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
    {
        return invalid("allowed characters are lowercase letters, digits, dots, and hyphens");
    }
    if name.starts_with(['.', '-']) || name.ends_with(['.', '-']) {
        return invalid("must start and end with a lowercase letter or digit");
    }
    if name.contains("..") {
        return invalid("cannot contain consecutive dots");
    }
    Ok(())
}
