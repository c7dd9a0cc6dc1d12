//! Endpoint configuration.

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com/1";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://search.twitter.com";

const API_BASE_URL_ENV: &str = "TWITTER_API_BASE_URL";
const SEARCH_BASE_URL_ENV: &str = "TWITTER_SEARCH_BASE_URL";

/// Where the REST and search endpoints live.
///
/// Deserializable from any serde format; missing keys fall back to the
/// public hosts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub search_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `TWITTER_API_BASE_URL` / `TWITTER_SEARCH_BASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            config = config.with_api_base_url(&url);
        }
        if let Ok(url) = std::env::var(SEARCH_BASE_URL_ENV) {
            config = config.with_search_base_url(&url);
        }
        config
    }

    pub fn with_api_base_url(self, url: &str) -> Self {
        Self {
            api_base_url: url.to_string(),
            ..self
        }
    }

    pub fn with_search_base_url(self, url: &str) -> Self {
        Self {
            search_base_url: url.to_string(),
            ..self
        }
    }

    pub(crate) fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub(crate) fn search_base(&self) -> &str {
        self.search_base_url.trim_end_matches('/')
    }
}
