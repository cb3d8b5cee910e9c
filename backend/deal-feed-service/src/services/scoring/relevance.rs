use super::half_life_decay;
use crate::models::{Candidate, UserContext};

/// Distance-aware cuisine match score.
///
/// `relevance = cuisine * cuisine_weight + distance_decay * distance_weight`. The result is
/// deliberately not normalized to [0, 1]; the constants are part of the ranking contract.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    preferred_cuisine_score: f64,
    other_cuisine_score: f64,
    cuisine_weight: f64,
    distance_weight: f64,
    distance_half_life_miles: f64,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self {
            preferred_cuisine_score: 1.0,
            other_cuisine_score: 0.2,
            cuisine_weight: 0.2,
            distance_weight: 0.1,
            distance_half_life_miles: 5.0,
        }
    }
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, candidate: &Candidate, user: &UserContext) -> f64 {
        self.cuisine_score(candidate, user) * self.cuisine_weight
            + self.distance_score(candidate.distance_miles) * self.distance_weight
    }

    pub fn cuisine_score(&self, candidate: &Candidate, user: &UserContext) -> f64 {
        match &candidate.cuisine_id {
            Some(cuisine) if user.preferred_cuisine_ids.contains(cuisine) => {
                self.preferred_cuisine_score
            }
            _ => self.other_cuisine_score,
        }
    }

    /// 1.0 at the user's location, halving every 5 miles. Unknown distance scores 0.
    pub fn distance_score(&self, distance_miles: Option<f64>) -> f64 {
        match distance_miles {
            Some(d) => half_life_decay(d, self.distance_half_life_miles),
            None => 0.0,
        }
    }
}
