use std::time::{Duration, Instant};

use crate::constants::{kinds, FOLLOWERS_LIMIT};
use crate::error::QueryError;
use crate::models::follow::{follower_pubkeys, followed_pubkeys, latest_contact_list};
use crate::models::TagKey;
use crate::nostr::{normalize_pubkey, QueryFilter, RelayQuery};

pub fn following_filter(subject: &str) -> QueryFilter {
    QueryFilter::new()
        .kinds([kinds::CONTACT_LIST])
        .author(subject)
        .limit(1)
}

pub fn followers_filter(subject: &str) -> QueryFilter {
    QueryFilter::new()
        .kinds([kinds::CONTACT_LIST])
        .tag(TagKey::Pubkey, [subject])
        .limit(FOLLOWERS_LIMIT)
}

/// Pubkeys `subject` (hex or `npub`) follows, in the order of its latest
/// contact list.
///
/// Several relays may each return their own latest copy, so the newest is
/// picked client-side.
pub async fn fetch_following(
    relay: &dyn RelayQuery,
    subject: &str,
    timeout: Duration,
) -> Result<Vec<String>, QueryError> {
    let subject = normalize_pubkey(subject)?;

    let start = Instant::now();
    let events = relay.query(vec![following_filter(&subject)], timeout).await?;

    let following = latest_contact_list(&events, &subject)
        .map(followed_pubkeys)
        .unwrap_or_default();

    tracing::debug!(
        subject = %subject,
        lists = events.len(),
        following = following.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fetched following list"
    );

    Ok(following)
}

/// Pubkeys whose contact lists name `subject`.
///
/// Approximate: every contact list a relay still holds counts, not only each
/// author's latest, so people who have since unfollowed can appear.
pub async fn fetch_followers(
    relay: &dyn RelayQuery,
    subject: &str,
    timeout: Duration,
) -> Result<Vec<String>, QueryError> {
    let subject = normalize_pubkey(subject)?;

    let start = Instant::now();
    let events = relay.query(vec![followers_filter(&subject)], timeout).await?;
    let followers = follower_pubkeys(&events, &subject);

    tracing::debug!(
        subject = %subject,
        lists = events.len(),
        followers = followers.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fetched followers"
    );

    Ok(followers)
}
