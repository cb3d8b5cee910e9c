//! User-scoped collaborators that supply the read-only parts of `UserContext`.

use crate::services::retrieval::RetrievalError;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait CuisinePreferenceProvider: Send + Sync {
    async fn preferred_cuisines(&self, user_id: &str) -> Result<HashSet<String>, RetrievalError>;
}

#[async_trait]
pub trait BlockedContentProvider: Send + Sync {
    async fn blocked_deals(&self, user_id: &str) -> Result<HashSet<String>, RetrievalError>;
}

/// Same cuisine set for every user.
#[derive(Debug, Clone, Default)]
pub struct StaticCuisinePreferences {
    cuisine_ids: HashSet<String>,
}

impl StaticCuisinePreferences {
    pub fn new(cuisine_ids: HashSet<String>) -> Self {
        Self { cuisine_ids }
    }
}

#[async_trait]
impl CuisinePreferenceProvider for StaticCuisinePreferences {
    async fn preferred_cuisines(&self, _user_id: &str) -> Result<HashSet<String>, RetrievalError> {
        Ok(self.cuisine_ids.clone())
    }
}

/// Same blocklist for every user.
#[derive(Debug, Clone, Default)]
pub struct StaticBlockedContent {
    deal_ids: HashSet<String>,
}

impl StaticBlockedContent {
    pub fn new(deal_ids: HashSet<String>) -> Self {
        Self { deal_ids }
    }
}

#[async_trait]
impl BlockedContentProvider for StaticBlockedContent {
    async fn blocked_deals(&self, _user_id: &str) -> Result<HashSet<String>, RetrievalError> {
        Ok(self.deal_ids.clone())
    }
}
