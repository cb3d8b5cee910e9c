use crate::models::ScoredCandidate;

/// Orders scored candidates by `weighted_score`, highest first.
///
/// The sort is stable, so equal scores keep retrieval order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    pub fn new() -> Self {
        Self
    }

    pub fn rank(&self, mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        sort_by_score_desc(&mut candidates);
        candidates
    }
}

pub(crate) fn sort_by_score_desc(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));
}
