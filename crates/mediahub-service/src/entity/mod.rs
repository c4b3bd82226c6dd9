//! Entity store implementations of the reference read/write collaborators.

pub mod memory;
pub mod rest;

use std::sync::Arc;

use mediahub_core::config::EntitiesConfig;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::entity::{EntityReader, EntityWriter};

pub use memory::MemoryEntityStore;
pub use rest::RestEntityStore;

/// Reader and writer handles for the configured entity store.
#[derive(Debug, Clone)]
pub struct EntityStore {
    /// Read side, used by reference resolution and the audit.
    pub reader: Arc<dyn EntityReader>,
    /// Write side, used only by the upload coordinator.
    pub writer: Arc<dyn EntityWriter>,
}

impl EntityStore {
    /// Build the store selected by `entities.provider`.
    pub fn from_config(config: &EntitiesConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "rest" => {
                let store = Arc::new(RestEntityStore::new(config)?);
                Ok(Self {
                    reader: store.clone(),
                    writer: store,
                })
            }
            "memory" => {
                let store = Arc::new(MemoryEntityStore::new());
                Ok(Self {
                    reader: store.clone(),
                    writer: store,
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown entity provider '{other}'"
            ))),
        }
    }
}
