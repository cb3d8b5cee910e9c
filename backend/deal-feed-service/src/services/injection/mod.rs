use crate::models::ScoredCandidate;

/// Policy for surfacing a low-ranked deal inside the visible window.
pub trait InjectionPolicy: Send + Sync {
    fn inject(&self, ranked: Vec<ScoredCandidate>) -> Vec<ScoredCandidate>;
}

/// Moves the last entry to a fixed slot. Not stochastic: the same input always
/// yields the same output.
#[derive(Debug, Clone, Copy)]
pub struct FixedSlotInjection {
    slot: usize,
    min_len: usize,
}

impl Default for FixedSlotInjection {
    fn default() -> Self {
        Self { slot: 3, min_len: 5 }
    }
}

impl FixedSlotInjection {
    pub fn new(slot: usize, min_len: usize) -> Self {
        Self { slot, min_len }
    }
}

impl InjectionPolicy for FixedSlotInjection {
    fn inject(&self, mut ranked: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        if ranked.len() < self.min_len {
            return ranked;
        }

        if let Some(tail) = ranked.pop() {
            let slot = self.slot.min(ranked.len());
            ranked.insert(slot, tail);
        }
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;

    fn list(ids: &[&str]) -> Vec<ScoredCandidate> {
        ids.iter()
            .map(|id| ScoredCandidate {
                candidate: Candidate {
                    deal_id: id.to_string(),
                    title: id.to_string(),
                    cuisine_id: None,
                    restaurant_id: None,
                    distance_miles: None,
                    created_at: None,
                },
                relevance: 0.0,
                quality: 0.0,
                recency: 0.0,
                weighted_score: 0.0,
            })
            .collect()
    }

    fn ids(list: &[ScoredCandidate]) -> Vec<&str> {
        list.iter().map(|s| s.candidate.deal_id.as_str()).collect()
    }

    #[test]
    fn test_tail_moves_to_fourth_slot() {
        let out = FixedSlotInjection::default().inject(list(&["A", "B", "C", "D", "E"]));
        assert_eq!(ids(&out), vec!["A", "B", "C", "E", "D"]);
    }

    #[test]
    fn test_longer_list() {
        let out = FixedSlotInjection::default().inject(list(&["A", "B", "C", "D", "E", "F", "G"]));
        assert_eq!(ids(&out), vec!["A", "B", "C", "G", "D", "E", "F"]);
    }

    #[test]
    fn test_short_lists_unchanged() {
        for n in 0..5 {
            let all = ["A", "B", "C", "D"];
            let input = list(&all[..n]);
            let out = FixedSlotInjection::default().inject(input.clone());
            assert_eq!(out, input);
        }
    }
}
