//! Client for the external `/data/pois` scoring service
//!
//! One `POST {base_url}/data/pois` per refresh. The body is built from the
//! user profile and priority order; a valid reply is
//! `{"success": true, "data": [record, ...]}`.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use whyhere_common::normalize::RawRecord;
use whyhere_common::profile::PoiRequest;

const USER_AGENT: &str = concat!("whyhere-rank/", env!("CARGO_PKG_VERSION"));

/// Why a `/data/pois` request produced no records
#[derive(Debug, Error)]
pub enum BackendRequestError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-2xx status, with the response body
    #[error("Backend error {0}: {1}")]
    ApiError(u16, String),

    /// Body is not JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON without `success: true` and a `data` array
    #[error("Unexpected backend response format: {0}")]
    MalformedResponse(String),
}

/// `/data/pois` client
#[derive(Debug, Clone)]
pub struct PoiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PoiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendRequestError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendRequestError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch raw records for `request`
    pub async fn fetch_records(&self, request: &PoiRequest) -> Result<Vec<RawRecord>, BackendRequestError> {
        let url = format!("{}/data/pois", self.base_url);

        tracing::debug!(url = %url, radius_km = request.radius_km, "Requesting POI records");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendRequestError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BackendRequestError::ApiError(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendRequestError::NetworkError(e.to_string()))?;
        let records = parse_poi_response(&body)?;

        tracing::info!(records = records.len(), "POI request successful");
        Ok(records)
    }
}

/// Validate the response envelope and extract its records
pub fn parse_poi_response(body: &str) -> Result<Vec<RawRecord>, BackendRequestError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| BackendRequestError::ParseError(e.to_string()))?;

    if json.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(BackendRequestError::MalformedResponse(
            "missing success: true".to_string(),
        ));
    }

    match json.get("data") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                RawRecord::deserialize(item)
                    .map_err(|e| BackendRequestError::MalformedResponse(e.to_string()))
            })
            .collect(),
        _ => Err(BackendRequestError::MalformedResponse(
            "data is not an array".to_string(),
        )),
    }
}
