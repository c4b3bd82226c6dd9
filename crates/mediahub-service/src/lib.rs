//! # mediahub-service
//!
//! Use cases on top of the storage gateway: the bucket registry, the upload
//! coordinator that keeps entity reference fields in step with stored
//! objects, the media library index with its reference audit, and the
//! read-side reference resolution with fallbacks.
//!
//! Components follow constructor injection: the gateway, the registry and
//! the entity store are handed in at construction time.

pub mod entity;
pub mod index;
pub mod reference;
pub mod registry;
pub mod upload;

pub use entity::{EntityStore, MemoryEntityStore, RestEntityStore};
pub use index::{AssetView, AuditReport, MediaIndex, MediaSource, ReferenceRecord};
pub use reference::{ReferenceFields, ReferenceSync};
pub use registry::{AssetCategory, BucketDescriptor, BucketRegistry};
pub use upload::{
    AssetReference, OrphanedAsset, UploadCoordinator, UploadError, UploadFile, UploadReceipt,
};
