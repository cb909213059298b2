//! Application-wide constants
//!
//! Centralized location for relay endpoints, event kinds, query limits and
//! timing windows that are used across multiple modules.

use std::time::Duration;

/// Primary relay, queried first
pub const PRIMARY_RELAY_URL: &str = "wss://relay.divine.video";

/// Default relay set, primary first
pub const DEFAULT_RELAY_URLS: &[&str] = &[
    PRIMARY_RELAY_URL,
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.nostr.band",
];

/// Relays known to support NIP-50 ranked full-text search
pub const SEARCH_RELAY_URLS: &[&str] = &["wss://relay.nostr.band", "wss://search.nos.today"];

/// Reaction contents that count as a like
pub const POSITIVE_REACTIONS: &[&str] = &["+", "❤️", "👍"];

// Nostr event kinds
pub mod kinds {
    /// Text note (counted as a comment on a video)
    pub const TEXT_NOTE: u16 = 1;
    /// Follow list (NIP-02)
    pub const CONTACT_LIST: u16 = 3;
    /// Deletion request (NIP-09)
    pub const DELETION: u16 = 5;
    /// Repost (NIP-18)
    pub const REPOST: u16 = 6;
    /// Reaction (NIP-25)
    pub const REACTION: u16 = 7;
    /// Threaded comment (NIP-22)
    pub const COMMENT: u16 = 1111;
    /// Zap receipt (NIP-57), used as a view proxy
    pub const ZAP_RECEIPT: u16 = 9735;
    /// Addressable short video
    pub const VIDEO: u16 = 34236;
}

// Result caps per filter
pub const METRICS_LIMIT: usize = 500;
pub const INTERACTION_LIMIT: usize = 10;
pub const DELETION_LIMIT: usize = 20;
pub const FOLLOWERS_LIMIT: usize = 10_000;

// Query time bounds
pub const METRICS_TIMEOUT: Duration = Duration::from_millis(3_000);
pub const INTERACTION_TIMEOUT: Duration = Duration::from_millis(2_000);
pub const FOLLOWING_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const FOLLOWERS_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Relay connect bound used by the nostr-sdk adapter
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Cache windows: (fresh for, evicted after)
pub const METRICS_CACHE: (Duration, Duration) = (Duration::from_secs(30), Duration::from_secs(5 * 60));
pub const INTERACTION_CACHE: (Duration, Duration) = (Duration::from_secs(10), Duration::from_secs(60));
pub const FOLLOWING_CACHE: (Duration, Duration) = (Duration::from_secs(60), Duration::from_secs(10 * 60));
pub const FOLLOWERS_CACHE: (Duration, Duration) = (Duration::from_secs(2 * 60), Duration::from_secs(10 * 60));
