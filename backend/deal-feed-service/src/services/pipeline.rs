use crate::config::RankingConfig;
use crate::metrics;
use crate::models::{FeedEntry, GeoPoint, PipelineStats, RawCandidate, ScoredCandidate, UserContext};
use crate::services::diversity::DiversityAdjuster;
use crate::services::gating::ContentGate;
use crate::services::injection::{FixedSlotInjection, InjectionPolicy};
use crate::services::providers::{BlockedContentProvider, CuisinePreferenceProvider};
use crate::services::ranking::Ranker;
use crate::services::retrieval::{CandidateRetriever, RetrievalError};
use crate::services::scoring::{CandidateScorer, HashBucketQuality, QualitySignalProvider, WeightedCombiner};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_RADIUS_MILES: f64 = 10.0;

/// Single-shot feed pipeline:
/// retrieve -> gate -> score -> rank -> diversity -> inject -> assemble.
///
/// Holds no per-request state; one instance serves all requests.
pub struct FeedPipeline {
    retriever: Arc<dyn CandidateRetriever>,
    cuisines: Arc<dyn CuisinePreferenceProvider>,
    blocked: Arc<dyn BlockedContentProvider>,
    gate: ContentGate,
    scorer: CandidateScorer,
    ranker: Ranker,
    diversity: DiversityAdjuster,
    injection: Box<dyn InjectionPolicy>,
    radius_miles: f64,
}

pub struct FeedPipelineBuilder {
    retriever: Arc<dyn CandidateRetriever>,
    cuisines: Arc<dyn CuisinePreferenceProvider>,
    blocked: Arc<dyn BlockedContentProvider>,
    quality: Arc<dyn QualitySignalProvider>,
    injection: Option<Box<dyn InjectionPolicy>>,
    ranking: RankingConfig,
    radius_miles: f64,
}

impl FeedPipelineBuilder {
    pub fn quality(mut self, quality: Arc<dyn QualitySignalProvider>) -> Self {
        self.quality = quality;
        self
    }

    pub fn injection(mut self, injection: Box<dyn InjectionPolicy>) -> Self {
        self.injection = Some(injection);
        self
    }

    pub fn ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn radius_miles(mut self, radius_miles: f64) -> Self {
        self.radius_miles = radius_miles;
        self
    }

    pub fn build(self) -> FeedPipeline {
        let ranking = self.ranking;
        let injection = self.injection.unwrap_or_else(|| {
            Box::new(FixedSlotInjection::new(
                ranking.injection_slot,
                ranking.injection_min_len,
            ))
        });

        FeedPipeline {
            retriever: self.retriever,
            cuisines: self.cuisines,
            blocked: self.blocked,
            gate: ContentGate::new(),
            scorer: CandidateScorer::new(
                self.quality,
                WeightedCombiner::from(&ranking),
                ranking.scoring_concurrency,
            ),
            ranker: Ranker::new(),
            diversity: DiversityAdjuster::with_resort(
                ranking.diversity_decay,
                ranking.resort_after_diversity,
            ),
            injection,
            radius_miles: self.radius_miles,
        }
    }
}

impl FeedPipeline {
    pub fn builder(
        retriever: Arc<dyn CandidateRetriever>,
        cuisines: Arc<dyn CuisinePreferenceProvider>,
        blocked: Arc<dyn BlockedContentProvider>,
    ) -> FeedPipelineBuilder {
        FeedPipelineBuilder {
            retriever,
            cuisines,
            blocked,
            quality: Arc::new(HashBucketQuality::new()),
            injection: None,
            ranking: RankingConfig::default(),
            radius_miles: DEFAULT_RADIUS_MILES,
        }
    }

    /// Builds the feed for one request. Any collaborator failure aborts the whole
    /// request; there is no partial feed.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn generate_feed(
        &self,
        user_id: &str,
        location: GeoPoint,
        now: DateTime<Utc>,
    ) -> Result<(Vec<FeedEntry>, PipelineStats), RetrievalError> {
        let started = Instant::now();
        let rows = self
            .retriever
            .nearby_deals(location, self.radius_miles)
            .await
            .map_err(|e| {
                error!("Deal retrieval failed: {}", e);
                e
            })?;
        metrics::record_stage_duration("retrieval", started.elapsed());

        if rows.is_empty() {
            debug!("No nearby deals, returning empty feed");
            return Ok((Vec::new(), PipelineStats::default()));
        }

        let (preferred_cuisine_ids, blocked_deal_ids) = futures::try_join!(
            self.cuisines.preferred_cuisines(user_id),
            self.blocked.blocked_deals(user_id),
        )?;

        let user = UserContext {
            user_id: user_id.to_string(),
            location,
            preferred_cuisine_ids,
            blocked_deal_ids,
        };

        let result = self.rank(rows, &user, now).await;

        info!(
            retrieved = result.1.retrieved,
            blocked = result.1.dropped_blocked,
            malformed = result.1.dropped_malformed,
            returned = result.1.returned,
            "Deal feed generated"
        );

        Ok(result)
    }

    /// Runs every stage after retrieval against an already-built user context.
    pub async fn rank(
        &self,
        rows: Vec<Option<RawCandidate>>,
        user: &UserContext,
        now: DateTime<Utc>,
    ) -> (Vec<FeedEntry>, PipelineStats) {
        let retrieved = rows.len();

        let gated = self.gate.filter(rows, &user.blocked_deal_ids);
        metrics::record_dropped("blocked", gated.dropped_blocked);
        metrics::record_dropped("malformed", gated.dropped_malformed);

        let started = Instant::now();
        let scored = self.scorer.score_all(gated.candidates, user, now).await;
        metrics::record_stage_duration("scoring", started.elapsed());

        let ordered = self.order(scored);
        let feed = assemble(ordered);

        let stats = PipelineStats {
            retrieved,
            dropped_malformed: gated.dropped_malformed,
            dropped_blocked: gated.dropped_blocked,
            returned: feed.len(),
        };

        (feed, stats)
    }

    /// Ranking, diversity and injection. Sequential by construction.
    pub fn order(&self, scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        let ranked = self.ranker.rank(scored);
        let diversified = self.diversity.adjust(ranked);
        self.injection.inject(diversified)
    }
}

/// Projects the final ordering to the public shape, dropping score fields.
pub fn assemble(ordered: Vec<ScoredCandidate>) -> Vec<FeedEntry> {
    ordered.into_iter().map(FeedEntry::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;
    use crate::services::providers::{StaticBlockedContent, StaticCuisinePreferences};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRetriever {
        rows: Vec<Option<RawCandidate>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CandidateRetriever for CountingRetriever {
        async fn nearby_deals(
            &self,
            _location: GeoPoint,
            radius_miles: f64,
        ) -> Result<Vec<Option<RawCandidate>>, RetrievalError> {
            assert_eq!(radius_miles, DEFAULT_RADIUS_MILES);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.clone())
        }
    }

    struct FailingCuisines;

    #[async_trait]
    impl CuisinePreferenceProvider for FailingCuisines {
        async fn preferred_cuisines(&self, _user_id: &str) -> Result<HashSet<String>, RetrievalError> {
            Err(RetrievalError::Provider("preferences unavailable".into()))
        }
    }

    fn row(id: &str) -> Option<RawCandidate> {
        Some(RawCandidate {
            deal_id: Some(id.to_string()),
            title: Some(id.to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_empty_retrieval_short_circuits_before_providers() {
        let retriever = Arc::new(CountingRetriever {
            rows: Vec::new(),
            calls: AtomicUsize::new(0),
        });
        let pipeline = FeedPipeline::builder(
            retriever.clone(),
            Arc::new(FailingCuisines),
            Arc::new(StaticBlockedContent::default()),
        )
        .build();

        let (feed, stats) = pipeline
            .generate_feed("u1", GeoPoint::default(), Utc::now())
            .await
            .unwrap();

        assert!(feed.is_empty());
        assert_eq!(stats.retrieved, 0);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_fails_closed() {
        let pipeline = FeedPipeline::builder(
            Arc::new(CountingRetriever {
                rows: vec![row("a")],
                calls: AtomicUsize::new(0),
            }),
            Arc::new(FailingCuisines),
            Arc::new(StaticBlockedContent::default()),
        )
        .build();

        let err = pipeline
            .generate_feed("u1", GeoPoint::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Provider(_)));
    }

    #[tokio::test]
    async fn test_all_blocked_gives_empty_feed() {
        let pipeline = FeedPipeline::builder(
            Arc::new(CountingRetriever {
                rows: vec![row("a"), row("b")],
                calls: AtomicUsize::new(0),
            }),
            Arc::new(StaticCuisinePreferences::default()),
            Arc::new(StaticBlockedContent::new(HashSet::from([
                "a".to_string(),
                "b".to_string(),
            ]))),
        )
        .build();

        let (feed, stats) = pipeline
            .generate_feed("u1", GeoPoint::default(), Utc::now())
            .await
            .unwrap();
        assert!(feed.is_empty());
        assert_eq!(stats.dropped_blocked, 2);
    }

    #[test]
    fn test_assemble_drops_scores_and_keeps_order() {
        let scored = |id: &str, score: f64| ScoredCandidate {
            candidate: Candidate {
                deal_id: id.to_string(),
                title: format!("{} title", id),
                cuisine_id: None,
                restaurant_id: None,
                distance_miles: None,
                created_at: None,
            },
            relevance: 0.1,
            quality: 0.2,
            recency: 0.3,
            weighted_score: score,
        };

        let feed = assemble(vec![scored("x", 0.1), scored("y", 0.9)]);
        assert_eq!(
            feed,
            vec![
                FeedEntry {
                    deal_id: "x".into(),
                    title: "x title".into()
                },
                FeedEntry {
                    deal_id: "y".into(),
                    title: "y title".into()
                },
            ]
        );
    }
}
