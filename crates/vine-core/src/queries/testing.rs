//! In-memory relay for query tests.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::QueryError;
use crate::models::RelayEvent;
use crate::nostr::{QueryFilter, RelayQuery};

/// Valid x-only public keys (the x coordinates of G and 2G on secp256k1).
pub(crate) const VIEWER: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
pub(crate) const SUBJECT: &str = "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";

#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    Answer,
    Hang,
    Fail(QueryError),
}

/// Answers each filter from a fixed event set, newest first, honoring
/// `limit` per filter. Matches from different filters are concatenated
/// without deduplication, like responses from several subscriptions.
pub(crate) struct MockRelay {
    events: Mutex<Vec<RelayEvent>>,
    behavior: Mutex<Behavior>,
    calls: Mutex<Vec<Vec<QueryFilter>>>,
}

impl MockRelay {
    pub fn new(events: Vec<RelayEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            behavior: Mutex::new(Behavior::Answer),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_behavior(self, behavior: Behavior) -> Self {
        *self.behavior.lock() = behavior;
        self
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn push(&self, event: RelayEvent) {
        self.events.lock().push(event);
    }

    pub fn calls(&self) -> Vec<Vec<QueryFilter>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RelayQuery for MockRelay {
    async fn query(
        &self,
        filters: Vec<QueryFilter>,
        _timeout: Duration,
    ) -> Result<Vec<RelayEvent>, QueryError> {
        self.calls.lock().push(filters.clone());
        let behavior = self.behavior.lock().clone();

        match behavior {
            Behavior::Hang => futures::future::pending().await,
            Behavior::Fail(e) => Err(e),
            Behavior::Answer => {
                let mut events = self.events.lock().clone();
                events.sort_by(|a, b| b.created_at.cmp(&a.created_at));

                let mut results = Vec::new();
                for filter in &filters {
                    let limit = filter.limit.unwrap_or(usize::MAX);
                    results.extend(
                        events
                            .iter()
                            .filter(|event| filter.matches(event))
                            .take(limit)
                            .cloned(),
                    );
                }
                Ok(results)
            }
        }
    }
}

pub(crate) fn event(
    id: &str,
    pubkey: &str,
    kind: u16,
    created_at: u64,
    content: &str,
    tags: &[&[&str]],
) -> RelayEvent {
    RelayEvent {
        id: id.to_string(),
        pubkey: pubkey.to_string(),
        kind,
        created_at,
        content: content.to_string(),
        tags: tags
            .iter()
            .map(|t| t.iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}
