//! Collaborator traits implemented by provider and service crates.

pub mod entity;
pub mod storage;

pub use entity::{EntityReader, EntityWriter};
pub use storage::ObjectStore;
