//! # mediahub-storage
//!
//! The storage side of MediaHub: the [`StorageGateway`] every component goes
//! through, the pure [`AssetResolver`] for public URLs, and the object store
//! providers (hosted storage REST API, local filesystem, in-memory).

pub mod gateway;
pub mod mime;
pub mod providers;
pub mod resolver;

pub use gateway::{ListingStream, StorageGateway};
pub use resolver::{AssetLocator, AssetResolver};
