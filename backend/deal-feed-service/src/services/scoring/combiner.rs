use crate::config::RankingConfig;

/// Linear blend of the three signals.
///
/// Default weights are 0.3 / 0.4 / 0.2 and intentionally sum to 0.9; they are not
/// renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCombiner {
    pub relevance_weight: f64,
    pub quality_weight: f64,
    pub recency_weight: f64,
}

impl Default for WeightedCombiner {
    fn default() -> Self {
        Self::from(&RankingConfig::default())
    }
}

impl From<&RankingConfig> for WeightedCombiner {
    fn from(config: &RankingConfig) -> Self {
        Self {
            relevance_weight: config.relevance_weight,
            quality_weight: config.quality_weight,
            recency_weight: config.recency_weight,
        }
    }
}

impl WeightedCombiner {
    pub fn combine(&self, relevance: f64, quality: f64, recency: f64) -> f64 {
        relevance * self.relevance_weight
            + quality * self.quality_weight
            + recency * self.recency_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ones_gives_point_nine() {
        let combiner = WeightedCombiner::default();
        assert!((combiner.combine(1.0, 1.0, 1.0) - 0.9).abs() <= f64::EPSILON);
    }

    #[test]
    fn test_weights_applied_per_signal() {
        let combiner = WeightedCombiner::default();
        assert!((combiner.combine(1.0, 0.0, 0.0) - 0.3).abs() < 1e-12);
        assert!((combiner.combine(0.0, 1.0, 0.0) - 0.4).abs() < 1e-12);
        assert!((combiner.combine(0.0, 0.0, 1.0) - 0.2).abs() < 1e-12);
    }
}
