//! Object store trait for pluggable storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;
use crate::types::{AssetPath, RawEntry, StoredObject};

/// Low-level object store backend.
///
/// Implementations receive keys that are already normalized; callers go
/// through `StorageGateway`, never through a backend directly. The trait is
/// defined here in `mediahub-core` and implemented in `mediahub-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "hosted", "local").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a new object. Must not silently replace an existing object.
    async fn put_object(
        &self,
        bucket: &str,
        path: &AssetPath,
        data: Bytes,
        mime_type: &str,
    ) -> AppResult<StoredObject>;

    /// Fetch one page of a folder listing, ordered by name.
    ///
    /// `folder` is normalized and may be empty for the bucket root.
    async fn list_page(
        &self,
        bucket: &str,
        folder: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<Vec<RawEntry>>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn remove_object(&self, bucket: &str, path: &AssetPath) -> AppResult<()>;

    /// Check whether an object exists.
    async fn object_exists(&self, bucket: &str, path: &AssetPath) -> AppResult<bool>;
}
