mod rpc_retriever;

use crate::models::{GeoPoint, RawCandidate};
use async_trait::async_trait;
use thiserror::Error;

pub use rpc_retriever::RpcCandidateRetriever;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Deal lookup transport error: {0}")]
    Transport(String),

    #[error("Deal lookup timed out after {0}ms")]
    Timeout(u64),

    #[error("Deal lookup failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Deal lookup returned an undecodable body: {0}")]
    Decode(String),

    #[error("User context lookup failed: {0}")]
    Provider(String),
}

/// Geospatial nearest-deal lookup.
///
/// Rows come back already annotated with `distance_miles`. A row that could not be
/// decoded is surfaced as `None` so the content gate can drop it without failing the
/// request.
#[async_trait]
pub trait CandidateRetriever: Send + Sync {
    async fn nearby_deals(
        &self,
        location: GeoPoint,
        radius_miles: f64,
    ) -> Result<Vec<Option<RawCandidate>>, RetrievalError>;
}
