//! Object store records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::path::AssetPath;

/// Result of a successful object write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Bucket the object was written to.
    pub bucket: String,
    /// Canonical key inside the bucket.
    pub path: AssetPath,
    /// Number of bytes written.
    pub size_bytes: u64,
    /// Content type sent with the object.
    pub mime_type: String,
}

/// One row of an object store listing, exactly as the store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Entry name relative to the listed folder.
    pub name: String,
    /// Reported size in bytes (zero for folders and placeholders).
    pub size_bytes: u64,
    /// Creation timestamp, when the store reports one.
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp, when the store reports one.
    pub updated_at: Option<DateTime<Utc>>,
    /// Content type from storage metadata (best effort).
    pub mime_type: Option<String>,
    /// Whether this entry is a folder rather than an object.
    pub is_folder: bool,
}
