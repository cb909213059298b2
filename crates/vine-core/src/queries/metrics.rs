use std::time::{Duration, Instant};

use super::dedup_by_id;
use crate::constants::{kinds, METRICS_LIMIT};
use crate::error::QueryError;
use crate::models::{MetricsSnapshot, TagKey, VideoRef};
use crate::nostr::{QueryFilter, RelayQuery};

const METRICS_KINDS: [u16; 5] = [
    kinds::REACTION,
    kinds::REPOST,
    kinds::TEXT_NOTE,
    kinds::COMMENT,
    kinds::ZAP_RECEIPT,
];

/// Filters for every event pointing at the video, by id and, when the
/// coordinate is known, by address. Both lowercase and NIP-22 root tags.
pub fn metrics_filters(video: &VideoRef) -> Vec<QueryFilter> {
    let base = || QueryFilter::new().kinds(METRICS_KINDS).limit(METRICS_LIMIT);

    let mut filters = vec![
        base().tag(TagKey::Event, [video.id.as_str()]),
        base().tag(TagKey::RootEvent, [video.id.as_str()]),
    ];

    if let Some(address) = video.address() {
        let coordinate = address.to_string();
        filters.push(base().tag(TagKey::Address, [coordinate.as_str()]));
        filters.push(base().tag(TagKey::RootAddress, [coordinate.as_str()]));
    }

    filters
}

pub async fn fetch_video_metrics(
    relay: &dyn RelayQuery,
    video: &VideoRef,
    timeout: Duration,
) -> Result<MetricsSnapshot, QueryError> {
    if video.id.is_empty() {
        return Err(QueryError::Malformed("empty video id".to_string()));
    }

    let start = Instant::now();
    let filters = metrics_filters(video);
    let filter_count = filters.len();

    let events = relay.query(filters, timeout).await?;
    let fetched = events.len();
    let events = dedup_by_id(events);
    let snapshot = MetricsSnapshot::from_events(&events);

    tracing::debug!(
        video = %video.id,
        filters = filter_count,
        fetched,
        unique = events.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fetched video metrics"
    );

    Ok(snapshot)
}
