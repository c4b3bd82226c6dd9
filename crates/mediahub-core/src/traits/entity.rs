//! Entity store collaborators.
//!
//! The relational store is outside this crate; these traits are the only
//! surface the media layer needs from it.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::OwnerRef;

/// Persists reference values into owner records.
#[async_trait]
pub trait EntityWriter: Send + Sync + std::fmt::Debug + 'static {
    /// Set `field` of `owner` to `url`.
    ///
    /// Fails with `RecordNotFound` when the owner does not exist. Writing the
    /// same value twice must be harmless.
    async fn write_reference(&self, owner: &OwnerRef, field: &str, url: &str) -> AppResult<()>;
}

/// Reads reference values from owner records.
#[async_trait]
pub trait EntityReader: Send + Sync + std::fmt::Debug + 'static {
    /// Current value of `field` on `owner`, `None` when null.
    async fn read_reference(&self, owner: &OwnerRef, field: &str) -> AppResult<Option<String>>;
}
