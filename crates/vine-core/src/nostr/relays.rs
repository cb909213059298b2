use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_RELAY_URLS, PRIMARY_RELAY_URL, SEARCH_RELAY_URLS};

/// Relay endpoints, with a distinguished primary and the subset known to
/// support NIP-50 search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    pub primary: String,
    pub urls: Vec<String>,
    pub search_urls: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            primary: PRIMARY_RELAY_URL.to_string(),
            urls: DEFAULT_RELAY_URLS.iter().map(|u| u.to_string()).collect(),
            search_urls: SEARCH_RELAY_URLS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl RelayConfig {
    /// Replace the relay list; the first entry becomes the primary.
    pub fn with_relays(mut self, urls: Vec<String>) -> Self {
        if let Some(first) = urls.first() {
            self.primary = first.clone();
            self.urls = urls;
        }
        self
    }

    /// Relays to query, primary first, without duplicates.
    pub fn query_relays(&self) -> Vec<String> {
        let mut relays = vec![self.primary.clone()];
        for url in &self.urls {
            if !relays.contains(url) {
                relays.push(url.clone());
            }
        }
        relays
    }

    /// Whether `url` points at a search-capable relay. Compared by hostname,
    /// so scheme, port and trailing slashes do not matter.
    pub fn supports_search(&self, url: &str) -> bool {
        let Some(host) = host_of(url) else {
            return false;
        };
        self.search_urls
            .iter()
            .filter_map(|u| host_of(u))
            .any(|h| h == host)
    }

    /// Configured relays that support search, in query order.
    pub fn search_relays(&self) -> Vec<String> {
        self.query_relays()
            .into_iter()
            .filter(|url| self.supports_search(url))
            .collect()
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}
