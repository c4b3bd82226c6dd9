//! Upload inputs, results and failures.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::types::{AssetPath, OwnerRef, StoredObject};

/// A candidate file handed to the coordinator.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name; only its extension is kept.
    pub file_name: String,
    /// Declared content type.
    pub mime_type: String,
    /// File content.
    pub data: Bytes,
}

impl UploadFile {
    /// Create a new upload file.
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// The value written into an owner's reference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReference {
    /// Bucket holding the object.
    pub bucket: String,
    /// Canonical object key.
    pub path: AssetPath,
    /// Canonical public URL of the object.
    pub public_url: String,
}

/// Result of a fully completed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    /// Reference now stored in the owner's field.
    pub reference: AssetReference,
    /// What the object store reported.
    pub stored: StoredObject,
}

/// An object that was stored but never referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanedAsset {
    /// Bucket holding the object.
    pub bucket: String,
    /// Object key.
    pub path: AssetPath,
    /// Public URL that should have been written.
    pub public_url: String,
    /// Record whose field was to be updated.
    pub owner: OwnerRef,
    /// Field that was to be updated.
    pub field: String,
}

impl fmt::Display for OrphanedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} (intended for {}.{})",
            self.bucket, self.path, self.owner, self.field
        )
    }
}

/// Failure of [`UploadCoordinator::upload`](super::UploadCoordinator::upload).
#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing was stored, or the store rejected the object.
    #[error(transparent)]
    Failed(#[from] AppError),
    /// The object was stored but the reference write failed.
    #[error("Stored {orphan} but could not reference it: {cause}")]
    Orphaned {
        /// The unreferenced object, for reconciliation.
        orphan: OrphanedAsset,
        /// Why the reference write failed.
        #[source]
        cause: AppError,
    },
}

impl UploadError {
    /// Kind of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Failed(err) => err.kind,
            Self::Orphaned { cause, .. } => cause.kind,
        }
    }

    /// The orphaned object, if the failure left one behind.
    pub fn orphan(&self) -> Option<&OrphanedAsset> {
        match self {
            Self::Failed(_) => None,
            Self::Orphaned { orphan, .. } => Some(orphan),
        }
    }
}
