pub mod diversity;
pub mod gating;
pub mod injection;
pub mod pipeline;
pub mod providers;
pub mod ranking;
pub mod retrieval;
pub mod scoring;

pub use diversity::DiversityAdjuster;
pub use gating::ContentGate;
pub use injection::{FixedSlotInjection, InjectionPolicy};
pub use pipeline::{assemble, FeedPipeline, FeedPipelineBuilder};
pub use providers::{
    BlockedContentProvider, CuisinePreferenceProvider, StaticBlockedContent,
    StaticCuisinePreferences,
};
pub use ranking::Ranker;
pub use retrieval::{CandidateRetriever, RetrievalError, RpcCandidateRetriever};
pub use scoring::{
    CandidateScorer, HashBucketQuality, QualitySignalProvider, RecencyScorer, RelevanceScorer,
    WeightedCombiner,
};
