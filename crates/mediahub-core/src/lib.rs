//! # mediahub-core
//!
//! Core crate for MediaHub. Contains configuration schemas, the canonical
//! storage path type, collaborator traits for the object store and the
//! entity store, and the unified error system.
//!
//! This crate has **no** internal dependencies on other MediaHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
