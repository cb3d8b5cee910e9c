use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use validator::{Validate, ValidationError};

/// Deal row as returned by the geospatial RPC. Every field is optional on the wire;
/// the content gate decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawCandidate {
    #[serde(default)]
    pub deal_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cuisine_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub restaurant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub distance_miles: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

/// Optional fields never reject the row: a value of the wrong JSON type reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// A deal eligible for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub deal_id: String,
    pub title: String,
    pub cuisine_id: Option<String>,
    pub restaurant_id: Option<String>,
    /// Non-negative when present
    pub distance_miles: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub relevance: f64,
    pub quality: f64,
    pub recency: f64,
    /// Set by the combiner, multiplied at most once more by the diversity pass
    pub weighted_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Per-request, read-only view of the user.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub user_id: String,
    pub location: GeoPoint,
    pub preferred_cuisine_ids: HashSet<String>,
    pub blocked_deal_ids: HashSet<String>,
}

/// The only externally visible projection of a ranked deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub deal_id: String,
    pub title: String,
}

impl From<ScoredCandidate> for FeedEntry {
    fn from(scored: ScoredCandidate) -> Self {
        Self {
            deal_id: scored.candidate.deal_id,
            title: scored.candidate.title,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedRequest {
    #[validate(custom(function = "not_blank"))]
    pub user_id: String,
    #[validate(nested)]
    pub location: LocationPayload,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct LocationPayload {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude out of range"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude out of range"))]
    pub longitude: f64,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("user_id must not be empty")));
    }
    Ok(())
}

impl From<LocationPayload> for GeoPoint {
    fn from(payload: LocationPayload) -> Self {
        Self {
            lat: payload.latitude,
            lng: payload.longitude,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub retrieved: usize,
    pub dropped_malformed: usize,
    pub dropped_blocked: usize,
    pub returned: usize,
}
