//! Component wiring shared by every command.

use std::sync::Arc;

use mediahub_core::config::AppConfig;
use mediahub_core::result::AppResult;
use mediahub_service::entity::EntityStore;
use mediahub_service::{BucketRegistry, MediaIndex, ReferenceSync, UploadCoordinator};
use mediahub_storage::{AssetResolver, StorageGateway, providers};

/// Components built once from the validated configuration.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Validated configuration.
    pub config: AppConfig,
    /// Category table.
    pub registry: Arc<BucketRegistry>,
    /// Storage gateway.
    pub gateway: StorageGateway,
    /// Entity reader and writer.
    pub entities: EntityStore,
}

impl AppContext {
    /// Build every component from `config`.
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        let registry = Arc::new(BucketRegistry::from_overrides(&config.buckets)?);
        let store = providers::from_config(&config.storage).await?;
        let gateway = StorageGateway::new(store, AssetResolver::from_config(&config.storage))
            .with_page_size(config.storage.list_page_size);
        let entities = EntityStore::from_config(&config.entities)?;

        tracing::debug!(
            provider = gateway.provider_type(),
            host = %config.storage.host,
            "Components initialized"
        );
        Ok(Self {
            config,
            registry,
            gateway,
            entities,
        })
    }

    /// Build only the resolver; commands that never touch a store use this.
    pub fn resolver(config: &AppConfig) -> AssetResolver {
        AssetResolver::from_config(&config.storage)
    }

    /// Upload coordinator over the configured stores.
    pub fn uploads(&self) -> UploadCoordinator {
        UploadCoordinator::new(
            Arc::clone(&self.registry),
            self.gateway.clone(),
            Arc::clone(&self.entities.writer),
            self.config.upload.retry.clone(),
        )
    }

    /// Media library index.
    pub fn index(&self) -> MediaIndex {
        MediaIndex::new(Arc::clone(&self.registry), self.gateway.clone())
    }

    /// Read-side reference resolution.
    pub fn references(&self) -> ReferenceSync {
        ReferenceSync::new(self.gateway.resolver().clone())
    }
}
