//! Tag extraction utilities for relay events
//!
//! Helpers over `RelayEvent::typed_tags` so callers never index raw tag arrays.

use super::event::{RelayEvent, TagKey};

/// Extract a single value from a tag by key.
/// Returns the first well-formed occurrence if multiple tags exist.
pub fn extract_tag_str(event: &RelayEvent, key: TagKey) -> Option<&str> {
    event
        .typed_tags()
        .find(|tag| tag.key() == Some(key))
        .and_then(|tag| tag.value())
}

/// Extract all values for a given tag key, in tag order.
/// Tags with a missing or empty value are skipped. No deduplication.
pub fn extract_all_tag_values(event: &RelayEvent, key: TagKey) -> Vec<String> {
    event
        .typed_tags()
        .filter(|tag| tag.key() == Some(key))
        .filter_map(|tag| tag.value())
        .map(|value| value.to_string())
        .collect()
}

/// Check if an event has a well-formed tag with the given key.
pub fn has_tag(event: &RelayEvent, key: TagKey) -> bool {
    event.typed_tags().any(|tag| tag.key() == Some(key))
}

/// Check if an event references `value` under `key`.
pub fn references(event: &RelayEvent, key: TagKey, value: &str) -> bool {
    event
        .typed_tags()
        .any(|tag| tag.key() == Some(key) && tag.value() == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_tags(tags: &[&[&str]]) -> RelayEvent {
        RelayEvent {
            id: "id".to_string(),
            pubkey: "pk".to_string(),
            kind: 3,
            created_at: 1,
            content: String::new(),
            tags: tags
                .iter()
                .map(|t| t.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_extract_tag_str() {
        let event = event_with_tags(&[&["e", ""], &["e", "first"], &["e", "second"]]);

        assert_eq!(extract_tag_str(&event, TagKey::Event), Some("first"));
        assert_eq!(extract_tag_str(&event, TagKey::Address), None);
    }

    #[test]
    fn test_extract_all_tag_values() {
        let event = event_with_tags(&[
            &["p", "alice"],
            &["p", ""],
            &["t", "rust"],
            &["p", "bob", "wss://relay.example"],
            &["p"],
        ]);

        let follows = extract_all_tag_values(&event, TagKey::Pubkey);
        assert_eq!(follows, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_has_tag() {
        let event = event_with_tags(&[&["a", "34236:pk:slug"], &["p", ""]]);

        assert!(has_tag(&event, TagKey::Address));
        assert!(!has_tag(&event, TagKey::Pubkey));
        assert!(references(&event, TagKey::Address, "34236:pk:slug"));
        assert!(!references(&event, TagKey::RootAddress, "34236:pk:slug"));
    }
}
