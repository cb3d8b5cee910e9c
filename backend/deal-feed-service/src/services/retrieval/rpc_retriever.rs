use super::{CandidateRetriever, RetrievalError};
use crate::config::RetrievalConfig;
use crate::models::{GeoPoint, RawCandidate};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Calls the backend's `nearby_deals` RPC over HTTP.
pub struct RpcCandidateRetriever {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct NearbyDealsParams {
    lat: f64,
    lng: f64,
    radius_miles: f64,
}

impl RpcCandidateRetriever {
    pub fn new(config: &RetrievalConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RetrievalError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.rpc_path.trim_start_matches('/')
            ),
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RetrievalError {
        if err.is_timeout() {
            RetrievalError::Timeout(self.timeout_ms)
        } else {
            RetrievalError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CandidateRetriever for RpcCandidateRetriever {
    async fn nearby_deals(
        &self,
        location: GeoPoint,
        radius_miles: f64,
    ) -> Result<Vec<Option<RawCandidate>>, RetrievalError> {
        let mut request = self.client.post(&self.endpoint).json(&NearbyDealsParams {
            lat: location.lat,
            lng: location.lng,
            radius_miles,
        });
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "nearby_deals RPC returned an error status");
            return Err(RetrievalError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let rows = decode_rows(&body)?;
        debug!(rows = rows.len(), "nearby_deals RPC completed");
        Ok(rows)
    }
}

/// Decodes a JSON array of deal rows. Individual rows that do not fit `RawCandidate`
/// (including `null`) become `None`; anything other than an array is an error.
pub(crate) fn decode_rows(body: &str) -> Result<Vec<Option<RawCandidate>>, RetrievalError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| RetrievalError::Decode(e.to_string()))?;

    Ok(values
        .into_iter()
        .map(|value| serde_json::from_value::<RawCandidate>(value).ok())
        .collect())
}

/// Pulls `message` (or `error`) out of an upstream error body, falling back to the raw text.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
