//! Object store provider implementations.

#[cfg(feature = "hosted")]
pub mod hosted;
pub mod local;
pub mod memory;

use std::sync::Arc;

use mediahub_core::config::StorageConfig;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::storage::ObjectStore;

/// Build the provider selected by `storage.provider`.
pub async fn from_config(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider.as_str() {
        #[cfg(feature = "hosted")]
        "hosted" => Ok(Arc::new(hosted::HostedObjectStore::new(config)?)),
        "local" => Ok(Arc::new(
            local::LocalObjectStore::new(&config.local.root_path).await?,
        )),
        "memory" => Ok(Arc::new(memory::MemoryObjectStore::new())),
        other => Err(AppError::configuration(format!(
            "Storage provider '{other}' is not available in this build"
        ))),
    }
}
