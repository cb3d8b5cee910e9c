use super::half_life_decay;
use crate::models::Candidate;
use chrono::{DateTime, Utc};

/// Freshness signal with a 48 hour half-life.
#[derive(Debug, Clone)]
pub struct RecencyScorer {
    half_life_hours: f64,
}

impl Default for RecencyScorer {
    fn default() -> Self {
        Self {
            half_life_hours: 48.0,
        }
    }
}

impl RecencyScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing `created_at` scores 0. Timestamps ahead of `now` count as brand new.
    pub fn score(&self, candidate: &Candidate, now: DateTime<Utc>) -> f64 {
        let Some(created_at) = candidate.created_at else {
            return 0.0;
        };

        let age_hours = (now - created_at).num_milliseconds().max(0) as f64 / 3_600_000.0;
        half_life_decay(age_hours, self.half_life_hours)
    }
}
