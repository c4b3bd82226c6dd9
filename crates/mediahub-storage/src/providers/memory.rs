//! In-memory object store, used for tests and dry runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::storage::ObjectStore;
use mediahub_core::types::{AssetPath, RawEntry, StoredObject};

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    mime_type: String,
    created_at: DateTime<Utc>,
}

/// Object store holding every object in a map keyed by (bucket, key).
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<(String, String), MemoryObject>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object directly, bypassing the no-overwrite rule. Used to
    /// seed fixtures such as zero-byte folder placeholders.
    pub async fn insert(
        &self,
        bucket: &str,
        key: &str,
        data: impl Into<Bytes>,
        created_at: DateTime<Utc>,
    ) {
        let mime_type = crate::mime::mime_from_path(key)
            .unwrap_or("application/octet-stream")
            .to_string();
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            MemoryObject {
                data: data.into(),
                mime_type,
                created_at,
            },
        );
    }

    /// Read an object's bytes.
    pub async fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.data.clone())
    }

    /// Total number of stored objects across buckets.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put_object(
        &self,
        bucket: &str,
        path: &AssetPath,
        data: Bytes,
        mime_type: &str,
    ) -> AppResult<StoredObject> {
        let mut objects = self.objects.write().await;
        let key = (bucket.to_string(), path.to_string());
        if objects.contains_key(&key) {
            return Err(AppError::conflict(format!(
                "Object already exists: {bucket}/{path}"
            )));
        }
        let size_bytes = data.len() as u64;
        objects.insert(
            key,
            MemoryObject {
                data,
                mime_type: mime_type.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.clone(),
            size_bytes,
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
        let objects = self.objects.read().await;
        let prefix = if folder.is_empty() {
            String::new()
        } else {
            format!("{folder}/")
        };

        let mut entries: BTreeMap<String, RawEntry> = BTreeMap::new();
        for ((b, key), object) in objects.iter() {
            if b != bucket {
                continue;
            }
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((sub, _)) => {
                    entries.entry(sub.to_string()).or_insert_with(|| RawEntry {
                        name: sub.to_string(),
                        size_bytes: 0,
                        created_at: None,
                        updated_at: None,
                        mime_type: None,
                        is_folder: true,
                    });
                }
                None => {
                    entries.insert(
                        rest.to_string(),
                        RawEntry {
                            name: rest.to_string(),
                            size_bytes: object.data.len() as u64,
                            created_at: Some(object.created_at),
                            updated_at: Some(object.created_at),
                            mime_type: Some(object.mime_type.clone()),
                            is_folder: false,
                        },
                    );
                }
            }
        }

        Ok(entries.into_values().skip(offset).take(limit).collect())
    }

    async fn remove_object(&self, bucket: &str, path: &AssetPath) -> AppResult<()> {
        self.objects
            .write()
            .await
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }

    async fn object_exists(&self, bucket: &str, path: &AssetPath) -> AppResult<bool> {
        Ok(self
            .objects
            .read()
            .await
            .contains_key(&(bucket.to_string(), path.to_string())))
    }
}
