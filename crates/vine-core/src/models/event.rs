use std::fmt;

use serde::{Deserialize, Serialize};

/// Single-letter tag keys this crate queries and reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TagKey {
    /// `e`: referenced event
    #[serde(rename = "e")]
    Event,
    /// `E`: root event of a thread (NIP-22)
    #[serde(rename = "E")]
    RootEvent,
    /// `a`: referenced addressable event
    #[serde(rename = "a")]
    Address,
    /// `A`: root addressable event (NIP-22)
    #[serde(rename = "A")]
    RootAddress,
    /// `p`: referenced pubkey
    #[serde(rename = "p")]
    Pubkey,
}

impl TagKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKey::Event => "e",
            TagKey::RootEvent => "E",
            TagKey::Address => "a",
            TagKey::RootAddress => "A",
            TagKey::Pubkey => "p",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "e" => Some(TagKey::Event),
            "E" => Some(TagKey::RootEvent),
            "a" => Some(TagKey::Address),
            "A" => Some(TagKey::RootAddress),
            "p" => Some(TagKey::Pubkey),
            _ => None,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of a raw tag.
///
/// A known key whose value is missing or empty is kept as `Other` so it never
/// reaches code that expects a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTag<'a> {
    Event(&'a str),
    RootEvent(&'a str),
    Address(&'a str),
    RootAddress(&'a str),
    Pubkey(&'a str),
    Other(&'a [String]),
}

impl<'a> EventTag<'a> {
    pub fn parse(raw: &'a [String]) -> Self {
        let key = raw.first().and_then(|k| TagKey::from_key(k));
        let value = raw.get(1).map(|v| v.as_str()).filter(|v| !v.is_empty());

        match (key, value) {
            (Some(TagKey::Event), Some(v)) => EventTag::Event(v),
            (Some(TagKey::RootEvent), Some(v)) => EventTag::RootEvent(v),
            (Some(TagKey::Address), Some(v)) => EventTag::Address(v),
            (Some(TagKey::RootAddress), Some(v)) => EventTag::RootAddress(v),
            (Some(TagKey::Pubkey), Some(v)) => EventTag::Pubkey(v),
            _ => EventTag::Other(raw),
        }
    }

    pub fn key(&self) -> Option<TagKey> {
        match self {
            EventTag::Event(_) => Some(TagKey::Event),
            EventTag::RootEvent(_) => Some(TagKey::RootEvent),
            EventTag::Address(_) => Some(TagKey::Address),
            EventTag::RootAddress(_) => Some(TagKey::RootAddress),
            EventTag::Pubkey(_) => Some(TagKey::Pubkey),
            EventTag::Other(_) => None,
        }
    }

    pub fn value(&self) -> Option<&'a str> {
        match self {
            EventTag::Event(v)
            | EventTag::RootEvent(v)
            | EventTag::Address(v)
            | EventTag::RootAddress(v)
            | EventTag::Pubkey(v) => Some(*v),
            EventTag::Other(_) => None,
        }
    }
}

/// A Nostr event as returned by a relay, in NIP-01 JSON shape.
///
/// Signatures are checked by the relay client, so `sig` is not carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEvent {
    pub id: String,
    pub pubkey: String,
    pub kind: u16,
    pub created_at: u64,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
}

impl RelayEvent {
    pub fn from_event(event: &nostr_sdk::Event) -> Self {
        Self {
            id: event.id.to_hex(),
            pubkey: event.pubkey.to_hex(),
            kind: event.kind.as_u16(),
            created_at: event.created_at.as_secs(),
            content: event.content.clone(),
            tags: event
                .tags
                .iter()
                .map(|tag| tag.as_slice().to_vec())
                .collect(),
        }
    }

    pub fn typed_tags(&self) -> impl Iterator<Item = EventTag<'_>> {
        self.tags.iter().map(|raw| EventTag::parse(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_sdk::prelude::*;

    fn raw(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_known_tags() {
        let e = raw(&["e", "abc", "wss://relay"]);
        assert_eq!(EventTag::parse(&e), EventTag::Event("abc"));

        let upper_a = raw(&["A", "34236:pk:slug"]);
        assert_eq!(EventTag::parse(&upper_a), EventTag::RootAddress("34236:pk:slug"));
    }

    #[test]
    fn test_parse_malformed_tags_as_other() {
        let empty_value = raw(&["p", ""]);
        assert_eq!(EventTag::parse(&empty_value), EventTag::Other(&empty_value));

        let missing_value = raw(&["e"]);
        assert!(EventTag::parse(&missing_value).value().is_none());

        let empty: Vec<String> = Vec::new();
        assert_eq!(EventTag::parse(&empty), EventTag::Other(&empty));

        let unknown = raw(&["t", "funny"]);
        assert_eq!(EventTag::parse(&unknown).key(), None);
    }

    #[test]
    fn test_from_signed_event() {
        let keys = Keys::generate();
        let event = EventBuilder::new(Kind::from(7), "+")
            .tag(Tag::custom(
                TagKind::Custom(std::borrow::Cow::Borrowed("e")),
                vec!["deadbeef"],
            ))
            .sign_with_keys(&keys)
            .expect("Failed to sign event");

        let converted = RelayEvent::from_event(&event);
        assert_eq!(converted.id, event.id.to_hex());
        assert_eq!(converted.pubkey, keys.public_key().to_hex());
        assert_eq!(converted.kind, 7);
        assert_eq!(converted.content, "+");
        assert_eq!(
            converted.typed_tags().collect::<Vec<_>>(),
            vec![EventTag::Event("deadbeef")]
        );
    }

    #[test]
    fn test_deserialize_nip01_json() {
        let json = r#"{
            "id": "aa11",
            "pubkey": "bb22",
            "kind": 6,
            "created_at": 1700000000,
            "tags": [["e", "cc33"]],
            "content": "",
            "sig": "ignored"
        }"#;
        let event: RelayEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, 6);
        assert_eq!(event.tags, vec![raw(&["e", "cc33"])]);
    }
}
