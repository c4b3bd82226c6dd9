//! Entity store (hosted REST tables) configuration.

use serde::{Deserialize, Serialize};

/// Where reference fields are read from and written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitiesConfig {
    /// Entity store backend: `"rest"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL of the table REST endpoint, e.g. `https://host/rest/v1`.
    #[serde(default)]
    pub rest_url: String,
    /// Service key sent as `apikey` and bearer token.
    #[serde(default)]
    pub service_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            rest_url: String::new(),
            service_key: String::new(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "rest".to_string()
}

fn default_timeout() -> u64 {
    15
}
