//! Shared domain types used across MediaHub crates.

pub mod object;
pub mod owner;
pub mod path;

pub use object::{RawEntry, StoredObject};
pub use owner::OwnerRef;
pub use path::{AssetPath, normalize_path};
