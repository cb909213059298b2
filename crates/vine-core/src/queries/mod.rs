//! Best-effort social queries for videos and profiles.
//!
//! `SocialQueries` owns the relay handle and one result cache per query type.
//! Every public operation returns an `Outcome`: on timeout, cancellation or
//! relay failure the value degrades (to the last cached value if one is still
//! held, else to an empty default) and the reason is attached.

pub mod bounded;
pub mod follows;
pub mod interactions;
pub mod metrics;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use crate::config::{QueryConfig, QueryTiming};
use crate::error::{Outcome, QueryError};
use crate::models::{FollowCounts, InteractionRecord, MetricsSnapshot, RelayEvent, VideoRef};
use crate::nostr::{normalize_pubkey, RelayQuery};
use crate::store::{Lookup, QueryCache};

pub use bounded::{bounded, cancel_channel, CancelSignal};

/// Drop repeated event ids, keeping the first occurrence and the relay order.
pub fn dedup_by_id(events: Vec<RelayEvent>) -> Vec<RelayEvent> {
    let mut seen = HashSet::with_capacity(events.len());
    events
        .into_iter()
        .filter(|event| seen.insert(event.id.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InteractionKey {
    video: VideoRef,
    viewer: String,
}

pub struct SocialQueries {
    relay: Arc<dyn RelayQuery>,
    config: QueryConfig,
    metrics_cache: QueryCache<VideoRef, MetricsSnapshot>,
    interaction_cache: QueryCache<InteractionKey, InteractionRecord>,
    following_cache: QueryCache<String, Vec<String>>,
    followers_cache: QueryCache<String, Vec<String>>,
}

impl SocialQueries {
    pub fn new(relay: Arc<dyn RelayQuery>, config: QueryConfig) -> Self {
        Self {
            relay,
            metrics_cache: QueryCache::from_timing(&config.metrics),
            interaction_cache: QueryCache::from_timing(&config.interaction),
            following_cache: QueryCache::from_timing(&config.following),
            followers_cache: QueryCache::from_timing(&config.followers),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Like, repost, comment and view counts for a video.
    pub async fn video_metrics(
        &self,
        video: &VideoRef,
        cancel: Option<&CancelSignal>,
    ) -> Outcome<MetricsSnapshot> {
        let timing = self.config.metrics;
        let fetch = metrics::fetch_video_metrics(self.relay.as_ref(), video, timing.timeout());
        cached(
            &self.metrics_cache,
            video.clone(),
            "video metrics",
            &timing,
            cancel,
            fetch,
        )
        .await
    }

    /// Whether `viewer` has liked or reposted a video. No viewer means no
    /// interaction and no relay traffic.
    pub async fn interaction(
        &self,
        video: &VideoRef,
        viewer: Option<&str>,
        cancel: Option<&CancelSignal>,
    ) -> Outcome<InteractionRecord> {
        let Some(viewer) = viewer.filter(|v| !v.is_empty()) else {
            return Outcome::ok(InteractionRecord::default());
        };

        let viewer = match pubkey_key(viewer, "interaction") {
            Ok(viewer) => viewer,
            Err(outcome) => return outcome,
        };

        let timing = self.config.interaction;
        let key = InteractionKey {
            video: video.clone(),
            viewer: viewer.clone(),
        };
        let fetch = interactions::fetch_interaction(
            self.relay.as_ref(),
            video,
            Some(&viewer),
            timing.timeout(),
        );
        cached(&self.interaction_cache, key, "interaction", &timing, cancel, fetch).await
    }

    /// Forget the cached interaction state, e.g. after the viewer published
    /// or deleted a reaction.
    pub fn invalidate_interaction(&self, video: &VideoRef, viewer: &str) -> bool {
        let Ok(viewer) = normalize_pubkey(viewer) else {
            return false;
        };
        self.interaction_cache.invalidate(&InteractionKey {
            video: video.clone(),
            viewer,
        })
    }

    /// Pubkeys `subject` (hex or `npub`) follows.
    pub async fn following(
        &self,
        subject: &str,
        cancel: Option<&CancelSignal>,
    ) -> Outcome<Vec<String>> {
        let subject = match pubkey_key(subject, "following") {
            Ok(subject) => subject,
            Err(outcome) => return outcome,
        };

        let timing = self.config.following;
        let fetch = follows::fetch_following(self.relay.as_ref(), &subject, timing.timeout());
        cached(
            &self.following_cache,
            subject.clone(),
            "following",
            &timing,
            cancel,
            fetch,
        )
        .await
    }

    /// Pubkeys following `subject`. Approximate, see `follows::fetch_followers`.
    pub async fn followers(
        &self,
        subject: &str,
        cancel: Option<&CancelSignal>,
    ) -> Outcome<Vec<String>> {
        let subject = match pubkey_key(subject, "followers") {
            Ok(subject) => subject,
            Err(outcome) => return outcome,
        };

        let timing = self.config.followers;
        let fetch = follows::fetch_followers(self.relay.as_ref(), &subject, timing.timeout());
        cached(
            &self.followers_cache,
            subject.clone(),
            "followers",
            &timing,
            cancel,
            fetch,
        )
        .await
    }

    /// Both follow list sizes. The two lookups are independent and run
    /// concurrently; the first failure, if any, is reported.
    pub async fn follow_counts(
        &self,
        subject: &str,
        cancel: Option<&CancelSignal>,
    ) -> Outcome<FollowCounts> {
        let (following, followers) = tokio::join!(
            self.following(subject, cancel),
            self.followers(subject, cancel)
        );

        let counts = FollowCounts {
            following: following.value.len(),
            followers: followers.value.len(),
        };
        match following.failure.or(followers.failure) {
            Some(failure) => Outcome::degraded(counts, failure),
            None => Outcome::ok(counts),
        }
    }

    /// Drop expired entries from every cache.
    pub fn sweep_caches(&self) -> usize {
        self.metrics_cache.sweep()
            + self.interaction_cache.sweep()
            + self.following_cache.sweep()
            + self.followers_cache.sweep()
    }
}

/// Normalize a hex or `npub` argument so cache keys and relay filters agree
/// with the lowercase hex that events carry. A bad key degrades the query.
fn pubkey_key<V: Default>(input: &str, label: &str) -> Result<String, Outcome<V>> {
    normalize_pubkey(input).map_err(|failure| {
        tracing::warn!("{} query degraded: {}", label, failure);
        Outcome::fallback(failure)
    })
}

/// Serve from cache when fresh, otherwise run `fetch` under the query's time
/// bound. Only successful results are stored.
async fn cached<K, V, F>(
    cache: &QueryCache<K, V>,
    key: K,
    label: &str,
    timing: &QueryTiming,
    cancel: Option<&CancelSignal>,
    fetch: F,
) -> Outcome<V>
where
    K: Eq + Hash,
    V: Clone + Default,
    F: Future<Output = Result<V, QueryError>>,
{
    let stale = match cache.get(&key) {
        Lookup::Fresh(value) => {
            tracing::trace!("{} served from cache", label);
            return Outcome::ok(value);
        }
        Lookup::Stale(value) => Some(value),
        Lookup::Missing => None,
    };

    match bounded(fetch, timing.timeout(), cancel).await {
        Ok(value) => {
            cache.insert(key, value.clone());
            Outcome::ok(value)
        }
        Err(failure) => {
            tracing::warn!("{} query degraded: {}", label, failure);
            match stale {
                Some(value) => Outcome::degraded(value, failure),
                None => Outcome::fallback(failure),
            }
        }
    }
}
