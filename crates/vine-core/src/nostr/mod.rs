pub mod client;
pub mod relays;

pub use client::{
    normalize_event_id, normalize_pubkey, NostrRelayClient, QueryFilter, RelayQuery,
};
pub use relays::RelayConfig;
