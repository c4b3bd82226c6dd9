//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend: `"hosted"`, `"local"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Storage host used in every public URL (no scheme, no trailing slash).
    pub host: String,
    /// Hosts that served public URLs before a migration; URLs on these
    /// hosts still resolve for display.
    #[serde(default)]
    pub legacy_hosts: Vec<String>,
    /// Service key sent as `apikey` and bearer token to the hosted store.
    #[serde(default)]
    pub service_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Number of entries fetched per listing request.
    #[serde(default = "default_page_size")]
    pub list_page_size: usize,
    /// `cache-control` max-age sent with uploaded objects.
    #[serde(default = "default_cache_control")]
    pub cache_control_seconds: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path; each bucket is a directory beneath it.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

impl StorageConfig {
    /// Configuration for the given host with every other field defaulted.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            provider: default_provider(),
            host: host.into(),
            legacy_hosts: Vec::new(),
            service_key: String::new(),
            request_timeout_seconds: default_timeout(),
            list_page_size: default_page_size(),
            cache_control_seconds: default_cache_control(),
            local: LocalStorageConfig::default(),
        }
    }
}

fn default_provider() -> String {
    "hosted".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    100
}

fn default_cache_control() -> u64 {
    3600
}

fn default_local_root() -> String {
    "./data/storage".to_string()
}
