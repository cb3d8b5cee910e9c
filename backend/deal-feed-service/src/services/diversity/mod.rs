use crate::models::ScoredCandidate;
use crate::services::ranking::sort_by_score_desc;
use std::collections::HashMap;

/// Diversity Adjuster - down-weights repeated restaurants.
///
/// Walks the ranked list once; the k-th deal from the same restaurant has its
/// `weighted_score` multiplied by `decay^(k-1)`. The list is not re-sorted unless
/// `resort` is set, so scores may end up non-monotonic. Deals without a restaurant
/// are never penalized.
#[derive(Debug, Clone)]
pub struct DiversityAdjuster {
    decay: f64,
    resort: bool,
}

impl Default for DiversityAdjuster {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl DiversityAdjuster {
    pub fn new(decay: f64) -> Self {
        Self {
            decay,
            resort: false,
        }
    }

    pub fn with_resort(decay: f64, resort: bool) -> Self {
        Self { decay, resort }
    }

    pub fn multiplier(&self, occurrence: usize) -> f64 {
        self.decay.powi(occurrence.saturating_sub(1) as i32)
    }

    pub fn adjust(&self, mut ranked: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        let mut seen: HashMap<String, usize> = HashMap::new();

        for scored in ranked.iter_mut() {
            let Some(restaurant_id) = scored.candidate.restaurant_id.as_ref() else {
                continue;
            };

            let occurrence = seen.entry(restaurant_id.clone()).or_insert(0);
            *occurrence += 1;
            if *occurrence > 1 {
                scored.weighted_score *= self.multiplier(*occurrence);
            }
        }

        if self.resort {
            sort_by_score_desc(&mut ranked);
        }

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;

    fn scored(id: &str, restaurant: Option<&str>, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                deal_id: id.to_string(),
                title: id.to_string(),
                cuisine_id: None,
                restaurant_id: restaurant.map(str::to_string),
                distance_miles: None,
                created_at: None,
            },
            relevance: 0.0,
            quality: 0.0,
            recency: 0.0,
            weighted_score: score,
        }
    }

    fn scores(list: &[ScoredCandidate]) -> Vec<f64> {
        list.iter().map(|s| s.weighted_score).collect()
    }

    #[test]
    fn test_same_restaurant_compounds() {
        let adjusted = DiversityAdjuster::default().adjust(vec![
            scored("a", Some("r1"), 1.0),
            scored("b", Some("r1"), 1.0),
            scored("c", Some("r1"), 1.0),
        ]);

        let got = scores(&adjusted);
        assert_eq!(got[0], 1.0);
        assert!((got[1] - 0.8).abs() < 1e-12);
        assert!((got[2] - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_counts_are_per_restaurant() {
        let adjusted = DiversityAdjuster::default().adjust(vec![
            scored("a", Some("r1"), 0.9),
            scored("b", Some("r2"), 0.8),
            scored("c", Some("r1"), 0.7),
            scored("d", None, 0.6),
            scored("e", None, 0.5),
        ]);

        let got = scores(&adjusted);
        assert_eq!(got[0], 0.9);
        assert_eq!(got[1], 0.8);
        assert!((got[2] - 0.56).abs() < 1e-12);
        assert_eq!(got[3], 0.6);
        assert_eq!(got[4], 0.5);
    }

    #[test]
    fn test_no_resort_by_default() {
        let adjusted = DiversityAdjuster::default().adjust(vec![
            scored("a", Some("r1"), 0.9),
            scored("b", Some("r1"), 0.85),
            scored("c", Some("r2"), 0.8),
        ]);

        // b drops to 0.68 but stays ahead of c
        let ids: Vec<_> = adjusted.iter().map(|s| s.candidate.deal_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(adjusted[1].weighted_score < adjusted[2].weighted_score);
    }

    #[test]
    fn test_resort_flag_restores_monotonic_order() {
        let adjusted = DiversityAdjuster::with_resort(0.8, true).adjust(vec![
            scored("a", Some("r1"), 0.9),
            scored("b", Some("r1"), 0.85),
            scored("c", Some("r2"), 0.8),
        ]);

        let ids: Vec<_> = adjusted.iter().map(|s| s.candidate.deal_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }
}
