//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use mediahub_core::config::RetryConfig;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::storage::ObjectStore;
use mediahub_core::types::{AssetPath, OwnerRef, RawEntry, StoredObject};
use mediahub_service::{
    BucketRegistry, MediaIndex, MemoryEntityStore, ReferenceSync, UploadCoordinator,
};
use mediahub_storage::providers::memory::MemoryObjectStore;
use mediahub_storage::{AssetResolver, StorageGateway};

/// Storage host used by every test.
pub const HOST: &str = "host";

/// Host of the project the storefront was migrated from.
pub const LEGACY_HOST: &str = "old-project.example.co";

/// Object store that counts calls and fails puts on demand.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    /// Backing store.
    pub inner: MemoryObjectStore,
    put_calls: AtomicUsize,
    list_calls: AtomicUsize,
    put_failures: Mutex<VecDeque<AppError>>,
}

impl ScriptedStore {
    /// Fail the next put calls with these errors, in order.
    pub fn fail_puts(&self, errors: impl IntoIterator<Item = AppError>) {
        self.put_failures.lock().unwrap().extend(errors);
    }

    /// Number of put attempts seen.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of listing pages requested.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for ScriptedStore {
    fn provider_type(&self) -> &str {
        "scripted"
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
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.put_failures.lock().unwrap().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }
        self.inner.put_object(bucket, path, data, mime_type).await
    }

    async fn list_page(
        &self,
        bucket: &str,
        folder: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<Vec<RawEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_page(bucket, folder, offset, limit).await
    }

    async fn remove_object(&self, bucket: &str, path: &AssetPath) -> AppResult<()> {
        self.inner.remove_object(bucket, path).await
    }

    async fn object_exists(&self, bucket: &str, path: &AssetPath) -> AppResult<bool> {
        self.inner.object_exists(bucket, path).await
    }
}

/// Every component wired over in-memory collaborators.
pub struct TestApp {
    /// Object store with call counters.
    pub store: Arc<ScriptedStore>,
    /// Entity store.
    pub entities: Arc<MemoryEntityStore>,
    /// Gateway over `store`.
    pub gateway: StorageGateway,
    /// Upload coordinator.
    pub uploads: UploadCoordinator,
    /// Media library index.
    pub index: MediaIndex,
    /// Read-side resolution.
    pub references: ReferenceSync,
}

impl TestApp {
    /// Create a new test application with the default retry policy.
    pub fn new() -> Self {
        Self::with_retry(RetryConfig::default())
    }

    /// Create a new test application with a custom retry policy.
    pub fn with_retry(retry: RetryConfig) -> Self {
        let store = Arc::new(ScriptedStore::default());
        let entities = Arc::new(MemoryEntityStore::new());
        let registry = Arc::new(BucketRegistry::default());
        let resolver = AssetResolver::new(HOST).with_legacy_hosts([LEGACY_HOST.to_string()]);
        let gateway = StorageGateway::new(store.clone(), resolver.clone()).with_page_size(2);

        Self {
            uploads: UploadCoordinator::new(
                registry.clone(),
                gateway.clone(),
                entities.clone(),
                retry,
            ),
            index: MediaIndex::new(registry, gateway.clone()),
            references: ReferenceSync::new(resolver),
            store,
            entities,
            gateway,
        }
    }

    /// Create an owner record with no fields set.
    pub async fn create_owner(&self, table: &str, id: u32) -> OwnerRef {
        let owner = OwnerRef::new(table, id);
        self.entities.insert_record(&owner).await;
        owner
    }
}

/// PNG-looking payload of `len` bytes.
pub fn png(len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    let signature = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let n = signature.len().min(len);
    data[..n].copy_from_slice(&signature[..n]);
    Bytes::from(data)
}
