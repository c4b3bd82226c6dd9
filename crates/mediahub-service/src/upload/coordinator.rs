//! Upload coordinator.
//!
//! Order of operations: validate, store (with bounded retry on transient
//! failures), then write the reference exactly once. The object store and
//! the entity store are not transactional; a failed reference write leaves
//! the object in place and reports it as orphaned.

use std::sync::Arc;

use chrono::Utc;
use tokio_retry2::{Retry, RetryError};
use tracing::{error, info, warn};

use mediahub_core::config::RetryConfig;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::entity::EntityWriter;
use mediahub_core::types::{AssetPath, OwnerRef, StoredObject};
use mediahub_storage::StorageGateway;

use super::naming::generate_object_name;
use super::types::{AssetReference, OrphanedAsset, UploadError, UploadFile, UploadReceipt};
use crate::registry::{AssetCategory, BucketRegistry};

/// Uploads files into their category's bucket and records the reference.
#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    registry: Arc<BucketRegistry>,
    gateway: StorageGateway,
    writer: Arc<dyn EntityWriter>,
    retry: RetryConfig,
}

impl UploadCoordinator {
    /// Creates a new upload coordinator.
    pub fn new(
        registry: Arc<BucketRegistry>,
        gateway: StorageGateway,
        writer: Arc<dyn EntityWriter>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            registry,
            gateway,
            writer,
            retry,
        }
    }

    /// Upload `file` into `category` and set `owner.field` to its public URL.
    pub async fn upload(
        &self,
        category: AssetCategory,
        file: UploadFile,
        owner: &OwnerRef,
        field: &str,
    ) -> Result<UploadReceipt, UploadError> {
        if field.trim().is_empty() {
            return Err(AppError::validation("Reference field name must not be empty").into());
        }
        self.registry
            .validate(category, file.size_bytes(), &file.mime_type)?;

        let descriptor = self.registry.describe(category);
        let name = generate_object_name(&file.file_name, &file.mime_type, Utc::now())?;
        let path = AssetPath::join(descriptor.folder_prefix.as_deref().unwrap_or(""), &name)?;

        let stored = self.put_with_retry(&descriptor.bucket, &path, &file).await?;
        let public_url = self
            .gateway
            .resolver()
            .to_public_url(&stored.bucket, &stored.path);

        if let Err(cause) = self.writer.write_reference(owner, field, &public_url).await {
            error!(
                bucket = %stored.bucket,
                path = %stored.path,
                public_url = %public_url,
                owner = %owner,
                field,
                error = %cause,
                "Stored object is orphaned: reference write failed"
            );
            return Err(UploadError::Orphaned {
                orphan: OrphanedAsset {
                    bucket: stored.bucket,
                    path: stored.path,
                    public_url,
                    owner: owner.clone(),
                    field: field.to_string(),
                },
                cause,
            });
        }

        info!(
            category = %category,
            bucket = %stored.bucket,
            path = %stored.path,
            owner = %owner,
            field,
            bytes = stored.size_bytes,
            "Upload completed"
        );
        Ok(UploadReceipt {
            reference: AssetReference {
                bucket: stored.bucket.clone(),
                path: stored.path.clone(),
                public_url,
            },
            stored,
        })
    }

    /// Store the object, retrying only transient failures.
    async fn put_with_retry(
        &self,
        bucket: &str,
        path: &AssetPath,
        file: &UploadFile,
    ) -> AppResult<StoredObject> {
        let gateway = &self.gateway;
        let max_attempts = self.retry.max_attempts;
        let mut attempt = 0usize;

        Retry::spawn(self.retry.delays(), || {
            attempt += 1;
            let attempt = attempt;
            let data = file.data.clone();
            async move {
                match gateway
                    .put(bucket, path.as_str(), data, &file.mime_type)
                    .await
                {
                    Ok(stored) => Ok(stored),
                    Err(err) if err.is_retryable() => {
                        warn!(
                            bucket,
                            path = %path,
                            attempt,
                            max_attempts,
                            error = %err,
                            "Transient storage failure"
                        );
                        Err(RetryError::Transient {
                            err,
                            retry_after: None,
                        })
                    }
                    Err(err) => Err(RetryError::Permanent(err)),
                }
            }
        })
        .await
    }
}
