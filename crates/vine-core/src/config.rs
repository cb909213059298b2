use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    FOLLOWERS_CACHE, FOLLOWERS_TIMEOUT, FOLLOWING_CACHE, FOLLOWING_TIMEOUT, INTERACTION_CACHE,
    INTERACTION_TIMEOUT, METRICS_CACHE, METRICS_TIMEOUT,
};
use crate::nostr::RelayConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    pub relays: RelayConfig,
    pub queries: QueryConfig,
}

/// Time bound and cache windows for one query type, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTiming {
    pub timeout_ms: u64,
    /// Cached results younger than this are served without asking relays
    pub fresh_ms: u64,
    /// Cached results older than this are dropped
    pub evict_ms: u64,
}

impl QueryTiming {
    const fn new(timeout: Duration, cache: (Duration, Duration)) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
            fresh_ms: cache.0.as_millis() as u64,
            evict_ms: cache.1.as_millis() as u64,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fresh_for(&self) -> Duration {
        Duration::from_millis(self.fresh_ms)
    }

    pub fn evict_after(&self) -> Duration {
        Duration::from_millis(self.evict_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryConfig {
    pub metrics: QueryTiming,
    pub interaction: QueryTiming,
    pub following: QueryTiming,
    pub followers: QueryTiming,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            metrics: QueryTiming::new(METRICS_TIMEOUT, METRICS_CACHE),
            interaction: QueryTiming::new(INTERACTION_TIMEOUT, INTERACTION_CACHE),
            following: QueryTiming::new(FOLLOWING_TIMEOUT, FOLLOWING_CACHE),
            followers: QueryTiming::new(FOLLOWERS_TIMEOUT, FOLLOWERS_CACHE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = CoreConfig::default();
        assert_eq!(config.queries.metrics.timeout(), Duration::from_millis(3000));
        assert_eq!(config.queries.interaction.timeout(), Duration::from_millis(2000));
        assert_eq!(config.queries.following.timeout(), Duration::from_millis(10000));
        assert_eq!(config.queries.followers.timeout(), Duration::from_millis(15000));
        assert_eq!(config.queries.metrics.fresh_for(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "queries": {
                "metrics": { "timeoutMs": 500, "freshMs": 0, "evictMs": 1000 }
            }
        }"#;
        let config: CoreConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.queries.metrics.timeout(), Duration::from_millis(500));
        assert_eq!(config.queries.followers, QueryConfig::default().followers);
        assert_eq!(config.relays, RelayConfig::default());
    }
}
