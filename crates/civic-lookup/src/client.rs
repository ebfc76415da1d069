//! Spatial search client.
//!
//! `SpatialLookup` is the seam the resolver talks through. `MapservClient`
//! implements it against the web API's search endpoint:
//! `GET {base}/search/{table}/{fields}?apiKey=..&spatialReference=..&geometry=point:[x,y]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use civic_core::config::LookupConfig;
use civic_core::error::{CivicError, Result};
use civic_core::types::Location;

use crate::error::ResolutionError;

/// One point-in-polygon query.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialQuery {
    pub table: String,
    pub fields: Vec<String>,
    pub location: Location,
    pub spatial_reference: u32,
}

impl SpatialQuery {
    /// Geometry parameter in the service's `point:[x,y]` form (x is longitude).
    pub fn geometry(&self) -> String {
        format!(
            "point:[{},{}]",
            self.location.longitude, self.location.latitude
        )
    }
}

/// External spatial search service.
///
/// Implementations return the raw reply body; shape validation is the
/// resolver's job. Transport failures map to `ResolutionError::ServiceError`.
#[async_trait]
pub trait SpatialLookup: Send + Sync {
    async fn search(&self, query: &SpatialQuery) -> std::result::Result<Value, ResolutionError>;
}

/// HTTP client for the web API search endpoint.
pub struct MapservClient {
    http: Client,
    base_url: String,
    api_key: String,
    referer: String,
}

impl MapservClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CivicError::Lookup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            referer: config.referer.clone(),
        })
    }

    /// Endpoint URL for a query, without the query string.
    pub fn search_url(&self, query: &SpatialQuery) -> String {
        format!(
            "{}/search/{}/{}",
            self.base_url,
            query.table,
            query.fields.join(",")
        )
    }
}

#[async_trait]
impl SpatialLookup for MapservClient {
    async fn search(&self, query: &SpatialQuery) -> std::result::Result<Value, ResolutionError> {
        let url = self.search_url(query);
        tracing::debug!(url = %url, geometry = %query.geometry(), "Spatial search");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.clone()),
                ("spatialReference", query.spatial_reference.to_string()),
                ("geometry", query.geometry()),
            ])
            .header(reqwest::header::REFERER, &self.referer)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ResolutionError::service(None, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ResolutionError::service(Some(status.as_u16()), format!("failed to read reply: {}", e))
        })?;

        if !status.is_success() {
            return Err(ResolutionError::service(
                Some(status.as_u16()),
                error_message(&body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            ResolutionError::service(Some(status.as_u16()), format!("reply is not JSON: {}", e))
        })
    }
}

/// Best message for a failed reply: the payload's `message` when it has one,
/// otherwise the first 200 characters of the body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
