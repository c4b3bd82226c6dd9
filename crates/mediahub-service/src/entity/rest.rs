//! Entity store over the hosted table REST interface.
//!
//! Rows are addressed with `?id=eq.{id}` filters; writes ask for the updated
//! rows back so a vanished record shows up as an empty array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use mediahub_core::config::EntitiesConfig;
use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::result::AppResult;
use mediahub_core::traits::entity::{EntityReader, EntityWriter};
use mediahub_core::types::OwnerRef;

/// Reads and writes reference fields through the table REST API.
#[derive(Debug, Clone)]
pub struct RestEntityStore {
    client: Client,
    rest_url: Url,
    service_key: String,
}

impl RestEntityStore {
    /// Create a client for `entities.rest_url`.
    pub fn new(config: &EntitiesConfig) -> AppResult<Self> {
        let raw = config.rest_url.trim().trim_end_matches('/');
        if raw.is_empty() {
            return Err(AppError::configuration("entities.rest_url must be set"));
        }
        let rest_url = Url::parse(&format!("{raw}/")).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid entities.rest_url '{raw}'"),
                e,
            )
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build entity HTTP client",
                    e,
                )
            })?;
        Ok(Self {
            client,
            rest_url,
            service_key: config.service_key.clone(),
        })
    }

    /// `{rest_url}/{table}?id=eq.{id}` plus any extra query pairs.
    fn row_url(&self, owner: &OwnerRef, extra: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.rest_url.join(&owner.table).map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Invalid table name '{}'", owner.table),
                e,
            )
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("id", &format!("eq.{}", owner.id));
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn rows(response: Response, owner: &OwnerRef) -> AppResult<Vec<Map<String, Value>>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, owner));
        }
        response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid response for {owner}"),
                e,
            )
        })
    }
}

fn status_error(status: StatusCode, body: &str, owner: &OwnerRef) -> AppError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::new(
            ErrorKind::PolicyDenied,
            format!("Table policy denied access to {owner} ({detail})"),
        ),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            AppError::transient(format!("Entity store busy for {owner} ({detail})"))
        }
        s if s.is_server_error() => {
            AppError::transient(format!("Entity store unavailable for {owner} ({detail})"))
        }
        _ => AppError::storage(format!("Entity request for {owner} failed ({detail})")),
    }
}

fn transport_error(err: reqwest::Error, owner: &OwnerRef) -> AppError {
    let kind = if err.is_timeout() || err.is_connect() {
        ErrorKind::Transient
    } else {
        ErrorKind::Storage
    };
    AppError::with_source(kind, format!("Entity request for {owner} failed: {err}"), err)
}

/// Field value as a reference string. Non-string values are passed through
/// as JSON text so the read path can classify them as unrecognized.
fn field_value(row: &Map<String, Value>, field: &str) -> Option<String> {
    match row.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

#[async_trait]
impl EntityWriter for RestEntityStore {
    async fn write_reference(&self, owner: &OwnerRef, field: &str, url: &str) -> AppResult<()> {
        let mut body = Map::new();
        body.insert(field.to_string(), Value::String(url.to_string()));

        let response = self
            .authorized(self.client.patch(self.row_url(owner, &[])?))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, owner))?;

        let rows = Self::rows(response, owner).await?;
        if rows.is_empty() {
            return Err(AppError::record_not_found(format!(
                "Record {owner} does not exist"
            )));
        }
        debug!(owner = %owner, field, "Reference field updated");
        Ok(())
    }
}

#[async_trait]
impl EntityReader for RestEntityStore {
    async fn read_reference(&self, owner: &OwnerRef, field: &str) -> AppResult<Option<String>> {
        let response = self
            .authorized(self.client.get(self.row_url(owner, &[("select", field)])?))
            .send()
            .await
            .map_err(|e| transport_error(e, owner))?;

        let rows = Self::rows(response, owner).await?;
        let row = rows.first().ok_or_else(|| {
            AppError::record_not_found(format!("Record {owner} does not exist"))
        })?;
        Ok(field_value(row, field))
    }
}
