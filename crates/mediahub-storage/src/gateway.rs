//! Storage gateway: the only path from MediaHub to the object store.
//!
//! Every call normalizes its path argument before it reaches a provider, so
//! providers only ever see canonical keys.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info};

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::storage::ObjectStore;
use mediahub_core::types::{AssetPath, RawEntry, StoredObject, normalize_path};

use crate::resolver::AssetResolver;

/// A lazy, finite stream of listing entries. Each call to
/// [`StorageGateway::list`] starts a fresh snapshot.
pub type ListingStream = BoxStream<'static, AppResult<RawEntry>>;

/// Default number of entries requested per listing page.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Handle to the object store plus the resolver for its public URLs.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    store: Arc<dyn ObjectStore>,
    resolver: AssetResolver,
    page_size: usize,
}

struct ListState {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    folder: String,
    offset: usize,
    remaining: usize,
    page_size: usize,
    done: bool,
}

impl StorageGateway {
    /// Create a gateway over `store`.
    pub fn new(store: Arc<dyn ObjectStore>, resolver: AssetResolver) -> Self {
        Self {
            store,
            resolver,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the number of entries fetched per listing request.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// The resolver used for public URLs.
    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    /// The underlying provider type name.
    pub fn provider_type(&self) -> &str {
        self.store.provider_type()
    }

    /// Check whether the object store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }

    /// Write a new object at the normalized `path`.
    pub async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        mime_type: &str,
    ) -> AppResult<StoredObject> {
        let path = AssetPath::parse(path)?;
        let size = data.len();
        let stored = self.store.put_object(bucket, &path, data, mime_type).await?;
        info!(bucket, path = %path, bytes = size, "Stored object");
        Ok(stored)
    }

    /// List up to `limit` entries under `folder`.
    ///
    /// Pages are fetched on demand; the stream ends at `limit` entries or at
    /// the first short page.
    pub fn list(&self, bucket: &str, folder: &str, limit: usize) -> AppResult<ListingStream> {
        let folder = normalize_path(folder)?;
        let state = ListState {
            store: Arc::clone(&self.store),
            bucket: bucket.to_string(),
            folder,
            offset: 0,
            remaining: limit,
            page_size: self.page_size,
            done: limit == 0,
        };

        Ok(stream::try_unfold(state, next_page)
            .map_ok(|entries| stream::iter(entries.into_iter().map(Ok::<_, AppError>)))
            .try_flatten()
            .boxed())
    }

    /// Delete the object at `path`. Missing objects are not an error.
    pub async fn remove(&self, bucket: &str, path: &str) -> AppResult<()> {
        let path = AssetPath::parse(path)?;
        self.store.remove_object(bucket, &path).await?;
        info!(bucket, path = %path, "Removed object");
        Ok(())
    }

    /// Check whether an object exists at `path`.
    pub async fn exists(&self, bucket: &str, path: &AssetPath) -> AppResult<bool> {
        self.store.object_exists(bucket, path).await
    }

    /// Canonical public URL for a raw path.
    pub fn resolve_public_url(&self, bucket: &str, path: &str) -> AppResult<String> {
        let path = AssetPath::parse(path)?;
        Ok(self.resolver.to_public_url(bucket, &path))
    }
}

/// Fetch the next listing page, or `None` once the listing is exhausted.
async fn next_page(mut state: ListState) -> AppResult<Option<(Vec<RawEntry>, ListState)>> {
    if state.done {
        return Ok(None);
    }
    let want = state.page_size.min(state.remaining);
    let mut page = state
        .store
        .list_page(&state.bucket, &state.folder, state.offset, want)
        .await?;
    debug!(
        bucket = %state.bucket,
        folder = %state.folder,
        offset = state.offset,
        entries = page.len(),
        "Fetched listing page"
    );

    if page.len() < want {
        state.done = true;
    }
    page.truncate(want);
    state.offset += page.len();
    state.remaining -= page.len();
    if state.remaining == 0 {
        state.done = true;
    }
    Ok(Some((page, state)))
}
