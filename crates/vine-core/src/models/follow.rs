use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::event::{RelayEvent, TagKey};
use super::tag_utils::extract_all_tag_values;
use crate::constants::kinds;

/// Follow list sizes for one identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowCounts {
    pub following: usize,
    pub followers: usize,
}

/// Pick the authoritative follow list: greatest `created_at`, then the
/// lowest id on equal timestamps (NIP-01 replaceable-event rule). `author`
/// is lowercase hex, the form event pubkeys carry.
pub fn latest_contact_list<'a>(
    events: impl IntoIterator<Item = &'a RelayEvent>,
    author: &str,
) -> Option<&'a RelayEvent> {
    events
        .into_iter()
        .filter(|event| event.kind == kinds::CONTACT_LIST && event.pubkey == author)
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| b.id.cmp(&a.id))
        })
}

/// Followed pubkeys of a contact list, in tag order.
pub fn followed_pubkeys(contact_list: &RelayEvent) -> Vec<String> {
    extract_all_tag_values(contact_list, TagKey::Pubkey)
}

/// Distinct authors of contact lists naming `subject`, sorted.
///
/// Any historical list counts, so authors who have since unfollowed may
/// still appear.
pub fn follower_pubkeys<'a>(
    events: impl IntoIterator<Item = &'a RelayEvent>,
    subject: &str,
) -> Vec<String> {
    events
        .into_iter()
        .filter(|event| event.kind == kinds::CONTACT_LIST)
        .filter(|event| {
            extract_all_tag_values(event, TagKey::Pubkey)
                .iter()
                .any(|p| p == subject)
        })
        .map(|event| event.pubkey.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts(id: &str, author: &str, created_at: u64, follows: &[&str]) -> RelayEvent {
        RelayEvent {
            id: id.to_string(),
            pubkey: author.to_string(),
            kind: 3,
            created_at,
            content: String::new(),
            tags: follows
                .iter()
                .map(|p| vec!["p".to_string(), p.to_string()])
                .collect(),
        }
    }

    #[test]
    fn test_latest_contact_list_by_timestamp() {
        let events = vec![
            contacts("old", "me", 10, &["a"]),
            contacts("new", "me", 20, &["b"]),
            contacts("other", "you", 30, &["c"]),
        ];
        let latest = latest_contact_list(&events, "me").unwrap();
        assert_eq!(latest.id, "new");
    }

    #[test]
    fn test_latest_contact_list_tie_breaks_on_lowest_id() {
        let events = vec![
            contacts("bbb", "me", 10, &["a"]),
            contacts("aaa", "me", 10, &["b"]),
            contacts("ccc", "me", 10, &["c"]),
        ];
        let latest = latest_contact_list(&events, "me").unwrap();
        assert_eq!(latest.id, "aaa");
    }

    #[test]
    fn test_followed_pubkeys_skips_empty_values() {
        let mut list = contacts("id", "me", 1, &["alice", "", "bob"]);
        list.tags.push(vec!["t".to_string(), "video".to_string()]);
        assert_eq!(followed_pubkeys(&list), vec!["alice", "bob"]);
    }

    #[test]
    fn test_follower_pubkeys_is_a_set() {
        let events = vec![
            contacts("1", "carol", 1, &["x"]),
            contacts("2", "carol", 2, &["x", "y"]),
            contacts("3", "alice", 1, &["x"]),
            contacts("4", "dave", 1, &["y"]),
        ];
        assert_eq!(follower_pubkeys(&events, "x"), vec!["alice", "carol"]);
    }
}
