pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod nostr;
pub mod queries;
pub mod store;

// Re-export the query surface at crate root for convenience
pub use config::CoreConfig;
pub use error::{Outcome, QueryError};
pub use models::{FollowCounts, InteractionRecord, MetricsSnapshot, VideoRef};
pub use nostr::{NostrRelayClient, RelayConfig, RelayQuery};
pub use queries::{cancel_channel, CancelSignal, SocialQueries};
