//! Per-candidate signals and their weighted blend.
//!
//! Each candidate is scored independently from the immutable `UserContext`, so scoring
//! fans out across candidates and is gathered back in retrieval order before ranking.

mod combiner;
mod quality;
mod recency;
mod relevance;

pub use combiner::WeightedCombiner;
pub use quality::{HashBucketQuality, QualitySignalProvider};
pub use recency::RecencyScorer;
pub use relevance::RelevanceScorer;

use crate::models::{Candidate, ScoredCandidate, UserContext};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// `0.5 ^ (x / half_life)`
pub fn half_life_decay(x: f64, half_life: f64) -> f64 {
    0.5_f64.powf(x / half_life)
}

pub struct CandidateScorer {
    relevance: RelevanceScorer,
    recency: RecencyScorer,
    quality: Arc<dyn QualitySignalProvider>,
    combiner: WeightedCombiner,
    concurrency: usize,
}

impl CandidateScorer {
    pub fn new(
        quality: Arc<dyn QualitySignalProvider>,
        combiner: WeightedCombiner,
        concurrency: usize,
    ) -> Self {
        Self {
            relevance: RelevanceScorer::new(),
            recency: RecencyScorer::new(),
            quality,
            combiner,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn score_one(
        &self,
        candidate: Candidate,
        user: &UserContext,
        now: DateTime<Utc>,
    ) -> ScoredCandidate {
        let relevance = self.relevance.score(&candidate, user);
        let recency = self.recency.score(&candidate, now);
        let quality = self.quality.quality(&candidate).await;

        ScoredCandidate {
            weighted_score: self.combiner.combine(relevance, quality, recency),
            candidate,
            relevance,
            quality,
            recency,
        }
    }

    /// Scores all candidates with bounded concurrency. Output order matches input order.
    pub async fn score_all(
        &self,
        candidates: Vec<Candidate>,
        user: &UserContext,
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate> {
        stream::iter(candidates)
            .map(|candidate| self.score_one(candidate, user, now))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
