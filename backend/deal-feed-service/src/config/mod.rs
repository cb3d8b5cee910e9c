use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub retrieval: RetrievalConfig,
    pub ranking: RankingConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub base_url: String,
    pub rpc_path: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub radius_miles: f64,
}

/// Tunables of the ranking pipeline. `Default` carries the production constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub relevance_weight: f64,
    pub quality_weight: f64,
    pub recency_weight: f64,
    pub diversity_decay: f64,
    pub resort_after_diversity: bool,
    pub injection_slot: usize,
    pub injection_min_len: usize,
    pub scoring_concurrency: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            relevance_weight: 0.3,
            quality_weight: 0.4,
            recency_weight: 0.2,
            diversity_decay: 0.8,
            resort_after_diversity: false,
            injection_slot: 3,
            injection_min_len: 5,
            scoring_concurrency: 16,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub preferred_cuisine_ids: HashSet<String>,
    pub blocked_deal_ids: HashSet<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = RankingConfig::default();

        Ok(Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("APP_PORT", 8080)?,
            },
            retrieval: RetrievalConfig {
                base_url: env::var("DEAL_RPC_URL")
                    .unwrap_or_else(|_| "http://localhost:54321".to_string()),
                rpc_path: env::var("DEAL_RPC_PATH")
                    .unwrap_or_else(|_| "/rest/v1/rpc/nearby_deals".to_string()),
                api_key: env::var("DEAL_RPC_API_KEY").ok().filter(|k| !k.is_empty()),
                timeout_ms: parse_var("DEAL_RPC_TIMEOUT_MS", 3000)?,
                radius_miles: parse_var("FEED_RADIUS_MILES", 10.0)?,
            },
            ranking: RankingConfig {
                relevance_weight: parse_var("FEED_WEIGHT_RELEVANCE", defaults.relevance_weight)?,
                quality_weight: parse_var("FEED_WEIGHT_QUALITY", defaults.quality_weight)?,
                recency_weight: parse_var("FEED_WEIGHT_RECENCY", defaults.recency_weight)?,
                diversity_decay: parse_var("FEED_DIVERSITY_DECAY", defaults.diversity_decay)?,
                resort_after_diversity: parse_var(
                    "FEED_RESORT_AFTER_DIVERSITY",
                    defaults.resort_after_diversity,
                )?,
                injection_slot: parse_var("FEED_INJECTION_SLOT", defaults.injection_slot)?,
                injection_min_len: parse_var("FEED_INJECTION_MIN_LEN", defaults.injection_min_len)?,
                scoring_concurrency: parse_var(
                    "FEED_SCORING_CONCURRENCY",
                    defaults.scoring_concurrency,
                )?
                .max(1),
            },
            providers: ProvidersConfig {
                preferred_cuisine_ids: parse_id_list(
                    &env::var("PREFERRED_CUISINE_IDS").unwrap_or_default(),
                ),
                blocked_deal_ids: parse_id_list(&env::var("BLOCKED_DEAL_IDS").unwrap_or_default()),
            },
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        _ => Ok(default),
    }
}

/// Comma-separated id list; blanks are skipped.
pub fn parse_id_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranking_weights() {
        let config = RankingConfig::default();
        assert_eq!(config.relevance_weight, 0.3);
        assert_eq!(config.quality_weight, 0.4);
        assert_eq!(config.recency_weight, 0.2);
        assert_eq!(config.diversity_decay, 0.8);
        assert!(!config.resort_after_diversity);
        assert_eq!(config.injection_slot, 3);
        assert_eq!(config.injection_min_len, 5);
    }

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list(" thai, mexican ,,  ");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("thai"));
        assert!(ids.contains("mexican"));
        assert!(parse_id_list("").is_empty());
    }

    #[test]
    fn test_parse_var_reports_key_on_invalid_value() {
        env::set_var("DEAL_FEED_TEST_BAD_PORT", "not-a-port");
        let err = parse_var::<u16>("DEAL_FEED_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("DEAL_FEED_TEST_BAD_PORT"));
        env::remove_var("DEAL_FEED_TEST_BAD_PORT");

        assert_eq!(parse_var::<u16>("DEAL_FEED_TEST_UNSET_PORT", 8080).unwrap(), 8080);
    }
}
