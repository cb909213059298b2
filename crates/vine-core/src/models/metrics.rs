use serde::{Deserialize, Serialize};

use super::event::RelayEvent;
use crate::constants::{kinds, POSITIVE_REACTIONS};

/// How a single event contributes to a video's social metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Like,
    Repost,
    Comment,
    /// Zap receipt, used as a stand-in for a view
    View,
}

impl Interaction {
    /// Classify an event. Reactions outside the positive allow-list and
    /// unrelated kinds yield `None`.
    pub fn classify(event: &RelayEvent) -> Option<Self> {
        match event.kind {
            kinds::REACTION if is_positive_reaction(&event.content) => Some(Interaction::Like),
            kinds::REPOST => Some(Interaction::Repost),
            kinds::TEXT_NOTE | kinds::COMMENT => Some(Interaction::Comment),
            kinds::ZAP_RECEIPT => Some(Interaction::View),
            _ => None,
        }
    }
}

pub fn is_positive_reaction(content: &str) -> bool {
    POSITIVE_REACTIONS.contains(&content)
}

/// Social counters for one video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub like_count: u64,
    pub repost_count: u64,
    pub view_count: u64,
    pub comment_count: u64,
}

impl MetricsSnapshot {
    pub fn record(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::Like => self.like_count += 1,
            Interaction::Repost => self.repost_count += 1,
            Interaction::Comment => self.comment_count += 1,
            Interaction::View => self.view_count += 1,
        }
    }

    /// Reduce already-deduplicated events to counts.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RelayEvent>) -> Self {
        let mut snapshot = Self::default();
        for interaction in events.into_iter().filter_map(Interaction::classify) {
            snapshot.record(interaction);
        }
        snapshot
    }
}
