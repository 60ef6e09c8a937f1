//! CRUD API record source
//!
//! Talks to the backend REST API:
//! - `GET {base}/api/v1/schema/entity/{entity}/`
//! - `GET {base}/api/v1/data/entity/{entity}/?skip&limit&search`
//! - `GET {base}/api/v1/data/count/{entity}/`
//! - `DELETE {base}/api/v1/data/{entity}/{id}/`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::domain::filter::Row;
use crate::domain::schema::EntitySchema;
use crate::utils::string::truncate_preview;

use super::error::DataError;
use super::traits::{ListParams, RecordSource};
use super::validate_entity;

/// Characters of a non-JSON body quoted in errors
const BODY_PREVIEW_LENGTH: usize = 100;

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug)]
pub struct ApiSource {
    client: reqwest::Client,
    base_url: String,
}

impl ApiSource {
    pub fn new(base_url: &str, timeout_secs: u64, cookie: Option<&str>) -> Result<Self, DataError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(cookie) = cookie.filter(|c| !c.is_empty()) {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(cookie)
                    .map_err(|e| DataError::Config(format!("invalid cookie header: {}", e)))?,
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!(base_url = %base_url, timeout_secs, "API source initialized");
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, DataError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| DataError::Config(format!("invalid API url: {}", e)))
    }

    fn list_url(&self, entity: &str, params: &ListParams) -> Result<Url, DataError> {
        let mut url = self.url(&format!("/api/v1/data/entity/{}/", entity))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("skip", &params.skip.to_string());
            if let Some(limit) = params.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
                query.append_pair("search", search);
            }
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, DataError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        decode_body(status, content_type.as_deref(), &body)
    }
}

/// Interpret an API response body.
///
/// Non-JSON bodies and non-2xx statuses become [`DataError::Http`]; error
/// bodies contribute their `message` field when present.
fn decode_body<T: DeserializeOwned>(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<T, DataError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return Err(DataError::http(
            status,
            format!(
                "Expected JSON response but got {}. Response: {}",
                content_type.unwrap_or("unknown"),
                truncate_preview(body, BODY_PREVIEW_LENGTH)
            ),
        ));
    }

    let value: JsonValue = serde_json::from_str(body)?;
    if !(200..300).contains(&status) {
        let message = value
            .get("message")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        return Err(DataError::http(status, message));
    }
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl RecordSource for ApiSource {
    async fn entity_schema(&self, entity: &str) -> Result<EntitySchema, DataError> {
        validate_entity(entity)?;
        let url = self.url(&format!("/api/v1/schema/entity/{}/", entity))?;
        tracing::debug!(url = %url, "Fetching entity schema");
        self.send(self.client.get(url)).await
    }

    async fn list_records(
        &self,
        entity: &str,
        params: &ListParams,
    ) -> Result<Vec<Row>, DataError> {
        validate_entity(entity)?;
        let url = self.list_url(entity, params)?;
        tracing::debug!(url = %url, "Fetching records");
        let rows: Vec<Row> = self.send(self.client.get(url)).await?;
        tracing::debug!(entity, rows = rows.len(), "Fetched records");
        Ok(rows)
    }

    async fn count(&self, entity: &str) -> Result<u64, DataError> {
        validate_entity(entity)?;
        let url = self.url(&format!("/api/v1/data/count/{}/", entity))?;
        let response: CountResponse = self.send(self.client.get(url)).await?;
        Ok(response.count)
    }

    async fn delete_record(&self, entity: &str, id: &str) -> Result<(), DataError> {
        validate_entity(entity)?;
        let mut url = self.url(&format!("/api/v1/data/{}/", entity))?;
        url.path_segments_mut()
            .map_err(|_| DataError::Config("API url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(id)
            .push("");
        tracing::debug!(url = %url, "Deleting record");

        let body: JsonValue = self.send(self.client.delete(url)).await?;
        if body.get("success").and_then(JsonValue::as_bool) == Some(false) {
            return Err(DataError::http(200, format!("delete of {} {} reported failure", entity, id)));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "api"
    }
}
