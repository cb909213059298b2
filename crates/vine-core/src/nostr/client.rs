use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use nostr_sdk::prelude::{Alphabet, Client, EventId, Filter, Kind, PublicKey, SingleLetterTag};
use serde::Serialize;

use super::relays::RelayConfig;
use crate::constants::CONNECT_TIMEOUT;
use crate::error::QueryError;
use crate::models::{RelayEvent, TagKey};

/// A relay filter: AND across fields, OR within a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryFilter {
    pub kinds: Vec<u16>,
    pub authors: Vec<String>,
    pub tags: BTreeMap<TagKey, Vec<String>>,
    pub limit: Option<usize>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u16>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn tag<S: Into<String>>(mut self, key: TagKey, values: impl IntoIterator<Item = S>) -> Self {
        self.tags
            .entry(key)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the filter against an event locally. `limit` is not applied.
    /// A tag constraint with no values matches nothing.
    pub fn matches(&self, event: &RelayEvent) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
            return false;
        }
        if !self.authors.is_empty() && !self.authors.contains(&event.pubkey) {
            return false;
        }
        self.tags.iter().all(|(key, values)| {
            event
                .typed_tags()
                .filter(|tag| tag.key() == Some(*key))
                .filter_map(|tag| tag.value())
                .any(|v| values.iter().any(|x| x == v))
        })
    }

    /// Convert to an nostr-sdk filter. Authors must be valid public keys and
    /// every tag constraint needs at least one value.
    pub fn to_nostr_filter(&self) -> Result<Filter, QueryError> {
        let mut filter = Filter::new();

        if !self.kinds.is_empty() {
            filter = filter.kinds(self.kinds.iter().map(|k| Kind::from(*k)));
        }

        if !self.authors.is_empty() {
            let authors = self
                .authors
                .iter()
                .map(|a| PublicKey::parse(a))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| QueryError::Malformed(format!("invalid author: {}", e)))?;
            filter = filter.authors(authors);
        }

        for (key, values) in &self.tags {
            // nostr-sdk would drop an empty constraint and widen the filter
            if values.is_empty() {
                return Err(QueryError::Malformed(format!(
                    "no values for #{} tag constraint",
                    key
                )));
            }
            for value in values {
                filter = filter.custom_tag(single_letter(*key), value.clone());
            }
        }

        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }

        Ok(filter)
    }
}

fn single_letter(key: TagKey) -> SingleLetterTag {
    match key {
        TagKey::Event => SingleLetterTag::lowercase(Alphabet::E),
        TagKey::RootEvent => SingleLetterTag::uppercase(Alphabet::E),
        TagKey::Address => SingleLetterTag::lowercase(Alphabet::A),
        TagKey::RootAddress => SingleLetterTag::uppercase(Alphabet::A),
        TagKey::Pubkey => SingleLetterTag::lowercase(Alphabet::P),
    }
}

/// Normalize a hex or `npub` public key to lowercase hex.
pub fn normalize_pubkey(input: &str) -> Result<String, QueryError> {
    PublicKey::parse(input)
        .map(|pk| pk.to_hex())
        .map_err(|e| QueryError::Malformed(format!("invalid public key {}: {}", input, e)))
}

/// Normalize a hex, `note` or `nevent` event id to lowercase hex.
pub fn normalize_event_id(input: &str) -> Result<String, QueryError> {
    EventId::parse(input)
        .map(|id| id.to_hex())
        .map_err(|e| QueryError::Malformed(format!("invalid event id {}: {}", input, e)))
}

/// Anything that can answer relay filters.
///
/// One call with several filters returns the union of their matches.
#[async_trait]
pub trait RelayQuery: Send + Sync {
    async fn query(
        &self,
        filters: Vec<QueryFilter>,
        timeout: Duration,
    ) -> Result<Vec<RelayEvent>, QueryError>;
}

/// `RelayQuery` backed by a read-only nostr-sdk client.
#[derive(Clone)]
pub struct NostrRelayClient {
    client: Client,
}

impl NostrRelayClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Add every configured relay and connect. A slow connect is logged, not
    /// fatal: relays that come up later still answer queries.
    pub async fn connect(relays: &RelayConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build();

        for url in relays.query_relays() {
            client
                .add_relay(&url)
                .await
                .with_context(|| format!("Failed to add relay {}", url))?;
        }

        let connect_start = Instant::now();
        match tokio::time::timeout(CONNECT_TIMEOUT, client.connect()).await {
            Ok(()) => tracing::debug!("Connect completed in {:?}", connect_start.elapsed()),
            Err(_) => tracing::warn!(
                "Relay connect timed out after {:?}, continuing",
                connect_start.elapsed()
            ),
        }

        Ok(Self::new(client))
    }

    pub async fn disconnect(&self) {
        self.client.disconnect().await;
    }
}

#[async_trait]
impl RelayQuery for NostrRelayClient {
    async fn query(
        &self,
        filters: Vec<QueryFilter>,
        timeout: Duration,
    ) -> Result<Vec<RelayEvent>, QueryError> {
        let nostr_filters = filters
            .iter()
            .map(QueryFilter::to_nostr_filter)
            .collect::<Result<Vec<_>, _>>()?;

        let fetches = nostr_filters
            .into_iter()
            .map(|filter| self.client.fetch_events(filter, timeout));
        let results = futures::future::try_join_all(fetches)
            .await
            .map_err(|e| QueryError::Relay(e.to_string()))?;

        Ok(results
            .into_iter()
            .flat_map(|events| events.into_iter())
            .map(|event| RelayEvent::from_event(&event))
            .collect())
    }
}
