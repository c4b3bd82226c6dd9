//! Hosted object store client for the storage REST API
//! (`https://{host}/storage/v1`).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use mediahub_core::config::StorageConfig;
use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::result::AppResult;
use mediahub_core::traits::storage::ObjectStore;
use mediahub_core::types::{AssetPath, RawEntry, StoredObject};

use crate::resolver::encode_key;

/// Hosted object store speaking the storage REST API.
#[derive(Debug, Clone)]
pub struct HostedObjectStore {
    client: Client,
    base_url: String,
    service_key: String,
    cache_control_seconds: u64,
}

/// One row of `POST /object/list/{bucket}`.
#[derive(Debug, Deserialize)]
struct ListRow {
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: Option<ListMetadata>,
}

#[derive(Debug, Deserialize)]
struct ListMetadata {
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    mimetype: Option<String>,
}

impl From<ListRow> for RawEntry {
    fn from(row: ListRow) -> Self {
        let is_folder = row.id.is_none() && row.metadata.is_none();
        let (size_bytes, mime_type) = row
            .metadata
            .map(|m| (m.size.unwrap_or(0), m.mimetype))
            .unwrap_or((0, None));
        RawEntry {
            name: row.name,
            size_bytes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            mime_type,
            is_folder,
        }
    }
}

impl HostedObjectStore {
    /// Create a client for the configured storage host.
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build storage HTTP client",
                    e,
                )
            })?;
        tracing::info!(host = %config.host, "Initializing hosted storage provider");
        Ok(Self {
            client,
            base_url: format!("https://{}/storage/v1", config.host.trim()),
            service_key: config.service_key.clone(),
            cache_control_seconds: config.cache_control_seconds,
        })
    }

    /// Point the client at a different base URL (e.g. a local emulator).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    fn object_url(&self, bucket: &str, path: &AssetPath) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url,
            bucket,
            encode_key(path.as_str())
        )
    }
}

/// Map a transport-level failure. Timeouts and connection failures may
/// succeed on a later attempt.
fn transport_error(err: reqwest::Error, action: &str) -> AppError {
    let kind = if err.is_timeout() || err.is_connect() || err.is_request() {
        ErrorKind::Transient
    } else {
        ErrorKind::Storage
    };
    AppError::with_source(kind, format!("Storage {action} failed: {err}"), err)
}

/// Map a non-success response to the error taxonomy.
async fn status_error(response: Response, bucket: &str, path: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || body.to_ascii_lowercase().contains("row-level security")
    {
        return AppError::policy_denied(bucket, path, detail);
    }
    match status {
        StatusCode::CONFLICT => {
            AppError::conflict(format!("Object already exists: {bucket}/{path} ({detail})"))
        }
        StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::size_exceeded(format!("Storage refused {bucket}/{path} as too large ({detail})"))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            AppError::transient(format!("Storage busy for {bucket}/{path} ({detail})"))
        }
        s if s.is_server_error() => {
            AppError::transient(format!("Storage unavailable for {bucket}/{path} ({detail})"))
        }
        _ => AppError::storage(format!("Storage request for {bucket}/{path} failed ({detail})")),
    }
}

#[async_trait]
impl ObjectStore for HostedObjectStore {
    fn provider_type(&self) -> &str {
        "hosted"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let response = self
            .authorized(self.client.get(format!("{}/bucket", self.base_url)))
            .send()
            .await
            .map_err(|e| transport_error(e, "health check"))?;
        Ok(response.status().is_success())
    }

    async fn put_object(
        &self,
        bucket: &str,
        path: &AssetPath,
        data: Bytes,
        mime_type: &str,
    ) -> AppResult<StoredObject> {
        let size_bytes = data.len() as u64;
        let response = self
            .authorized(self.client.post(self.object_url(bucket, path)))
            .header("Content-Type", mime_type)
            .header("cache-control", format!("max-age={}", self.cache_control_seconds))
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| transport_error(e, "upload"))?;

        if !response.status().is_success() {
            let err = status_error(response, bucket, path.as_str()).await;
            warn!(bucket, path = %path, kind = %err.kind, "Storage upload rejected");
            return Err(err);
        }

        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.clone(),
            size_bytes,
            mime_type: mime_type.to_string(),
        })
    }

    async fn list_page(
        &self,
        bucket: &str,
        folder: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<Vec<RawEntry>> {
        let body = json!({
            "prefix": folder,
            "limit": limit,
            "offset": offset,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let response = self
            .authorized(
                self.client
                    .post(format!("{}/object/list/{}", self.base_url, bucket)),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, "list"))?;

        if !response.status().is_success() {
            return Err(status_error(response, bucket, folder).await);
        }

        let rows: Vec<ListRow> = response
            .json()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Invalid listing", e))?;
        debug!(bucket, folder, rows = rows.len(), "Listed storage folder");
        Ok(rows.into_iter().map(RawEntry::from).collect())
    }

    async fn remove_object(&self, bucket: &str, path: &AssetPath) -> AppResult<()> {
        let response = self
            .authorized(
                self.client
                    .delete(format!("{}/object/{}", self.base_url, bucket)),
            )
            .json(&json!({ "prefixes": [path.as_str()] }))
            .send()
            .await
            .map_err(|e| transport_error(e, "delete"))?;

        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(status_error(response, bucket, path.as_str()).await)
        }
    }

    async fn object_exists(&self, bucket: &str, path: &AssetPath) -> AppResult<bool> {
        let url = format!(
            "{}/object/public/{}/{}",
            self.base_url,
            bucket,
            encode_key(path.as_str())
        );
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| transport_error(e, "existence check"))?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            _ => Err(status_error(response, bucket, path.as_str()).await),
        }
    }
}
