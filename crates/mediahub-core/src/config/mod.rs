//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The merged configuration is validated once, at startup, and then
//! handed to the components that need it.

pub mod buckets;
pub mod entities;
pub mod logging;
pub mod storage;
pub mod upload;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use self::buckets::{BucketOverride, validate_bucket_name};
pub use self::entities::EntitiesConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::{LocalStorageConfig, StorageConfig};
pub use self::upload::{RetryConfig, UploadConfig};

use crate::error::AppError;
use crate::result::AppResult;

const STORAGE_PROVIDERS: [&str; 3] = ["hosted", "local", "memory"];
const ENTITY_PROVIDERS: [&str; 2] = ["rest", "memory"];

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Object storage settings.
    pub storage: StorageConfig,
    /// Entity store settings.
    #[serde(default)]
    pub entities: EntitiesConfig,
    /// Upload coordinator settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Per-category bucket overrides keyed by category name.
    #[serde(default)]
    pub buckets: BTreeMap<String, BucketOverride>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and validate it.
    ///
    /// Merges `path`, an optional `config/{env}` overlay, and environment
    /// variables prefixed with `MEDIAHUB__` (nested keys separated by `__`).
    pub fn load(path: &str, env: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MEDIAHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("storage.legacy_hosts"),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml(source: &str) -> AppResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would only fail later, mid-request.
    pub fn validate(&self) -> AppResult<()> {
        let host = self.storage.host.trim();
        if host.is_empty() {
            return Err(AppError::configuration("storage.host must be set"));
        }
        if host.contains("://")
            || host
                .chars()
                .any(|c| matches!(c, '/' | '?' | '#' | '@') || c.is_whitespace())
        {
            return Err(AppError::configuration(format!(
                "storage.host must be a bare host name with an optional port, got '{host}'"
            )));
        }
        if !STORAGE_PROVIDERS.contains(&self.storage.provider.as_str()) {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{}'",
                self.storage.provider
            )));
        }
        if !ENTITY_PROVIDERS.contains(&self.entities.provider.as_str()) {
            return Err(AppError::configuration(format!(
                "Unknown entity provider '{}'",
                self.entities.provider
            )));
        }
        if self.storage.list_page_size == 0 {
            return Err(AppError::configuration(
                "storage.list_page_size must be greater than zero",
            ));
        }
        if self.upload.retry.max_attempts == 0 {
            return Err(AppError::configuration(
                "upload.retry.max_attempts must be at least 1",
            ));
        }
        for (category, entry) in &self.buckets {
            entry.validate(category)?;
        }
        Ok(())
    }
}
