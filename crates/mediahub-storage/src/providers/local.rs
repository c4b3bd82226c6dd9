//! Local filesystem object store. Each bucket is a directory under the root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::result::AppResult;
use mediahub_core::traits::storage::ObjectStore;
use mediahub_core::types::{AssetPath, RawEntry, StoredObject};

use crate::mime::mime_from_path;

const TEMP_PREFIX: &str = ".tmp-";

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all buckets.
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    fn bucket_root(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    fn resolve(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.bucket_root(bucket);
        path.extend(key.split('/').filter(|s| !s.is_empty()));
        path
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put_object(
        &self,
        bucket: &str,
        path: &AssetPath,
        data: Bytes,
        mime_type: &str,
    ) -> AppResult<StoredObject> {
        let full_path = self.resolve(bucket, path.as_str());
        self.ensure_parent(&full_path).await?;

        let tmp_path = full_path.with_file_name(format!("{TEMP_PREFIX}{}", Uuid::new_v4()));
        let write_tmp = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await
        };
        if let Err(e) = write_tmp.await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {bucket}/{path}"),
                e,
            ));
        }

        // Linking fails if the target exists, so a completed object is never
        // replaced and readers never see a partial file.
        let linked = fs::hard_link(&tmp_path, &full_path).await;
        let _ = fs::remove_file(&tmp_path).await;
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AppError::conflict(format!(
                    "Object already exists: {bucket}/{path}"
                )));
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to commit object: {bucket}/{path}"),
                    e,
                ));
            }
        }

        debug!(bucket, path = %path, bytes = data.len(), "Wrote object");
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.clone(),
            size_bytes: data.len() as u64,
            mime_type: mime_type.to_string(),
        })
    }

    async fn list_page(
        &self,
        bucket: &str,
        folder: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<Vec<RawEntry>> {
        let dir_path = self.resolve(bucket, folder);
        let mut dir = match fs::read_dir(&dir_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list {bucket}/{folder}"),
                    e,
                ));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(TEMP_PREFIX) {
                continue;
            }
            let meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let created_at = meta
                .created()
                .or_else(|_| meta.modified())
                .ok()
                .map(chrono::DateTime::<chrono::Utc>::from);
            let updated_at = meta.modified().ok().map(chrono::DateTime::<chrono::Utc>::from);

            entries.push(RawEntry {
                mime_type: if meta.is_file() {
                    mime_from_path(&name).map(str::to_string)
                } else {
                    None
                },
                name,
                size_bytes: if meta.is_file() { meta.len() } else { 0 },
                created_at,
                updated_at,
                is_folder: meta.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries.into_iter().skip(offset).take(limit).collect())
    }

    async fn remove_object(&self, bucket: &str, path: &AssetPath) -> AppResult<()> {
        let full_path = self.resolve(bucket, path.as_str());
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {bucket}/{path}"),
                e,
            )),
        }
    }

    async fn object_exists(&self, bucket: &str, path: &AssetPath) -> AppResult<bool> {
        let full_path = self.resolve(bucket, path.as_str());
        Ok(fs::metadata(&full_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false))
    }
}
