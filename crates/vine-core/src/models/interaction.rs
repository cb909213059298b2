use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::event::{RelayEvent, TagKey};
use super::metrics::is_positive_reaction;
use super::tag_utils::extract_all_tag_values;
use crate::constants::kinds;

/// Whether a viewer has liked or reposted a video, with the event ids needed
/// to retract those interactions later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub has_liked: bool,
    pub has_reposted: bool,
    pub like_event_id: Option<String>,
    pub repost_event_id: Option<String>,
}

impl InteractionRecord {
    /// Fold interaction events in relay order, skipping deleted ones.
    /// The last matching like or repost wins.
    pub fn fold<'a>(
        events: impl IntoIterator<Item = &'a RelayEvent>,
        deleted: &HashSet<String>,
    ) -> Self {
        let mut record = Self::default();
        for event in events {
            if deleted.contains(&event.id) {
                continue;
            }
            match event.kind {
                kinds::REACTION if is_positive_reaction(&event.content) => {
                    record.has_liked = true;
                    record.like_event_id = Some(event.id.clone());
                }
                kinds::REPOST => {
                    record.has_reposted = true;
                    record.repost_event_id = Some(event.id.clone());
                }
                _ => {}
            }
        }
        record
    }
}

/// Ids retracted by deletion events. Only deletions by `author` (lowercase
/// hex) count.
pub fn deletion_set<'a>(
    deletions: impl IntoIterator<Item = &'a RelayEvent>,
    author: &str,
) -> HashSet<String> {
    deletions
        .into_iter()
        .filter(|event| event.kind == kinds::DELETION && event.pubkey == author)
        .flat_map(|event| extract_all_tag_values(event, TagKey::Event))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, pubkey: &str, kind: u16, content: &str, tags: &[&[&str]]) -> RelayEvent {
        RelayEvent {
            id: id.to_string(),
            pubkey: pubkey.to_string(),
            kind,
            created_at: 0,
            content: content.to_string(),
            tags: tags
                .iter()
                .map(|t| t.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_fold_sets_ids() {
        let events = vec![
            event("like", "viewer", 7, "+", &[]),
            event("repost", "viewer", 6, "", &[]),
        ];
        let record = InteractionRecord::fold(&events, &HashSet::new());
        assert!(record.has_liked);
        assert!(record.has_reposted);
        assert_eq!(record.like_event_id.as_deref(), Some("like"));
        assert_eq!(record.repost_event_id.as_deref(), Some("repost"));
    }

    #[test]
    fn test_fold_ignores_negative_reaction_and_deleted() {
        let events = vec![
            event("dislike", "viewer", 7, "-", &[]),
            event("like", "viewer", 7, "❤️", &[]),
        ];
        let deleted: HashSet<String> = ["like".to_string()].into_iter().collect();
        let record = InteractionRecord::fold(&events, &deleted);
        assert_eq!(record, InteractionRecord::default());
    }

    #[test]
    fn test_fold_last_match_wins() {
        let events = vec![
            event("first", "viewer", 7, "+", &[]),
            event("second", "viewer", 7, "👍", &[]),
        ];
        let record = InteractionRecord::fold(&events, &HashSet::new());
        assert_eq!(record.like_event_id.as_deref(), Some("second"));
    }

    #[test]
    fn test_deletion_set_only_counts_author() {
        let deletions = vec![
            event("d1", "viewer", 5, "", &[&["e", "like"], &["e", ""]]),
            event("d2", "someone", 5, "", &[&["e", "repost"]]),
            event("d3", "viewer", 1, "", &[&["e", "note"]]),
        ];
        let set = deletion_set(&deletions, "viewer");
        assert_eq!(set.len(), 1);
        assert!(set.contains("like"));
    }
}
