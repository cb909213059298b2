pub mod address;
pub mod event;
pub mod follow;
pub mod interaction;
pub mod metrics;
pub mod tag_utils;

pub use address::{VideoAddress, VideoRef};
pub use event::{EventTag, RelayEvent, TagKey};
pub use follow::FollowCounts;
pub use interaction::InteractionRecord;
pub use metrics::{Interaction, MetricsSnapshot};
