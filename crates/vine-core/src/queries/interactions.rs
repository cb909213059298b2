use std::time::{Duration, Instant};

use super::dedup_by_id;
use crate::constants::{kinds, DELETION_LIMIT, INTERACTION_LIMIT};
use crate::error::QueryError;
use crate::models::interaction::deletion_set;
use crate::models::{InteractionRecord, TagKey, VideoRef};
use crate::nostr::{normalize_pubkey, QueryFilter, RelayQuery};

/// Stage one: the viewer's reactions and reposts pointing at the video.
pub fn interaction_filters(video: &VideoRef, viewer: &str) -> Vec<QueryFilter> {
    let base = || {
        QueryFilter::new()
            .kinds([kinds::REPOST, kinds::REACTION])
            .author(viewer)
            .limit(INTERACTION_LIMIT)
    };

    let mut filters = vec![base().tag(TagKey::Event, [video.id.as_str()])];
    if let Some(address) = video.address() {
        filters.push(base().tag(TagKey::Address, [address.to_string()]));
    }
    filters
}

/// Stage two: the viewer's deletions of any stage-one event.
pub fn deletion_filter(viewer: &str, event_ids: &[String]) -> QueryFilter {
    QueryFilter::new()
        .kinds([kinds::DELETION])
        .author(viewer)
        .tag(TagKey::Event, event_ids.iter().cloned())
        .limit(DELETION_LIMIT)
}

/// Look up whether `viewer` (hex or `npub`) has liked or reposted `video`.
///
/// Two sequential relay calls: the deletion query is built from the ids the
/// first call returned, so they cannot run in parallel.
pub async fn fetch_interaction(
    relay: &dyn RelayQuery,
    video: &VideoRef,
    viewer: Option<&str>,
    timeout: Duration,
) -> Result<InteractionRecord, QueryError> {
    let Some(viewer) = viewer.filter(|v| !v.is_empty()) else {
        return Ok(InteractionRecord::default());
    };
    if video.id.is_empty() {
        return Err(QueryError::Malformed("empty video id".to_string()));
    }
    let viewer = normalize_pubkey(viewer)?;
    let viewer = viewer.as_str();

    let start = Instant::now();
    let interactions = dedup_by_id(
        relay
            .query(interaction_filters(video, viewer), timeout)
            .await?,
    );

    if interactions.is_empty() {
        tracing::debug!(video = %video.id, viewer, "No interactions found");
        return Ok(InteractionRecord::default());
    }

    let ids: Vec<String> = interactions.iter().map(|e| e.id.clone()).collect();
    let deletions = relay
        .query(vec![deletion_filter(viewer, &ids)], timeout)
        .await?;
    let deleted = deletion_set(&deletions, viewer);

    let record = InteractionRecord::fold(&interactions, &deleted);

    tracing::debug!(
        video = %video.id,
        viewer,
        interactions = interactions.len(),
        deleted = deleted.len(),
        has_liked = record.has_liked,
        has_reposted = record.has_reposted,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fetched interaction state"
    );

    Ok(record)
}
