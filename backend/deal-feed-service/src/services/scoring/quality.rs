use crate::models::Candidate;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Deal quality / reputation signal in `[0, 1)`.
#[async_trait]
pub trait QualitySignalProvider: Send + Sync {
    async fn quality(&self, candidate: &Candidate) -> f64;
}

/// Placeholder signal: a stable hash of the deal id mapped into 10 buckets
/// (0.0, 0.1, ..., 0.9). Deterministic across processes and releases.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashBucketQuality;

const BUCKETS: u64 = 10;

impl HashBucketQuality {
    pub fn new() -> Self {
        Self
    }

    pub fn bucket(deal_id: &str) -> f64 {
        let digest = Sha256::digest(deal_id.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % BUCKETS) as f64 / BUCKETS as f64
    }
}

#[async_trait]
impl QualitySignalProvider for HashBucketQuality {
    async fn quality(&self, candidate: &Candidate) -> f64 {
        Self::bucket(&candidate.deal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_is_stable() {
        assert_eq!(HashBucketQuality::bucket("deal-1"), 0.3);
        assert_eq!(HashBucketQuality::bucket("deal-2"), 0.8);
        assert_eq!(HashBucketQuality::bucket("a"), 0.0);
        assert_eq!(HashBucketQuality::bucket("b"), 0.6);
    }

    #[test]
    fn test_bucket_range() {
        for i in 0..500 {
            let q = HashBucketQuality::bucket(&format!("deal-{}", i));
            assert!((0.0..1.0).contains(&q));
            assert!(((q * 10.0).round() - q * 10.0).abs() < 1e-9);
        }
    }
}
