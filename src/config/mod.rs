//! Application configuration management
//!
//! Loaded from environment variables with the same `env::var(..).unwrap_or_else(..)`
//! defaulting style the teacher repository uses throughout its own `Config::from_env`.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind port.
    pub port: u16,

    /// Directory holding the tantivy index segments for every indexed
    /// collection (§6 "Index schema"). Created on first run if absent.
    pub index_path: String,

    /// Path to the IPTC taxonomy table (§4.2). A bundled default ships with
    /// the binary; this only needs to be set to override it.
    pub iptc_taxonomy_path: Option<String>,

    /// Path to the small `cache_version:<prefix>` registry (§6 "Persisted state").
    pub cache_version_path: Option<String>,

    /// Per-source deadlines (§5).
    pub deadlines: DeadlineConfig,

    /// Brokered provider base URLs and credentials.
    pub providers: ProviderConfig,

    /// `spawn_blocking` permit budget for index searches (§5 "index connection
    /// is a pool, size configurable, default 10").
    pub index_pool_size: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DeadlineConfig {
    pub index_autocomplete: Duration,
    pub index_search: Duration,
    pub brokered_search: Duration,
    pub request_wide_slack: Duration,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            index_autocomplete: Duration::from_millis(250),
            index_search: Duration::from_millis(1500),
            brokered_search: Duration::from_millis(2500),
            request_wide_slack: Duration::from_millis(500),
        }
    }
}

impl DeadlineConfig {
    /// Brokered deadline for `mode=autocomplete`: disabled (§4.6 "0 ms
    /// autocomplete — i.e. disabled"). Modeled as `Duration::ZERO` so a
    /// `tokio::time::timeout` around it fires immediately.
    #[must_use]
    pub const fn brokered_autocomplete(&self) -> Duration {
        Duration::ZERO
    }

    /// Request-wide deadline = max of per-source deadlines + slack (§5).
    #[must_use]
    pub fn request_wide(&self) -> Duration {
        let max_per_source = self
            .index_autocomplete
            .max(self.index_search)
            .max(self.brokered_search);
        max_per_source + self.request_wide_slack
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub news_base_url: String,
    pub news_api_key: Option<String>,
    pub video_base_url: String,
    pub video_api_key: Option<String>,
    pub ratings_base_url: String,
    pub ratings_api_key: Option<String>,
    pub artist_base_url: String,
    pub artist_api_key: Option<String>,
    pub album_base_url: String,
    pub album_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            index_path: env::var("INDEX_PATH").unwrap_or_else(|_| "./data/index".to_string()),

            iptc_taxonomy_path: env::var("IPTC_TAXONOMY_PATH").ok(),

            cache_version_path: env::var("CACHE_VERSION_PATH").ok(),

            deadlines: DeadlineConfig::default(),

            providers: ProviderConfig {
                news_base_url: env::var("NEWS_PROVIDER_URL")
                    .unwrap_or_else(|_| "https://news.example.invalid".to_string()),
                news_api_key: env::var("NEWS_PROVIDER_API_KEY").ok(),
                video_base_url: env::var("VIDEO_PROVIDER_URL")
                    .unwrap_or_else(|_| "https://video.example.invalid".to_string()),
                video_api_key: env::var("VIDEO_PROVIDER_API_KEY").ok(),
                ratings_base_url: env::var("RATINGS_PROVIDER_URL")
                    .unwrap_or_else(|_| "https://ratings.example.invalid".to_string()),
                ratings_api_key: env::var("RATINGS_PROVIDER_API_KEY").ok(),
                artist_base_url: env::var("ARTIST_PROVIDER_URL")
                    .unwrap_or_else(|_| "https://artist.example.invalid".to_string()),
                artist_api_key: env::var("ARTIST_PROVIDER_API_KEY").ok(),
                album_base_url: env::var("ALBUM_PROVIDER_URL")
                    .unwrap_or_else(|_| "https://album.example.invalid".to_string()),
                album_api_key: env::var("ALBUM_PROVIDER_API_KEY").ok(),
            },

            index_pool_size: env::var("INDEX_POOL_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wide_deadline_adds_slack_to_max_per_source() {
        let d = DeadlineConfig::default();
        assert_eq!(d.request_wide(), Duration::from_millis(2000));
    }

    #[test]
    fn brokered_autocomplete_deadline_is_disabled() {
        let d = DeadlineConfig::default();
        assert_eq!(d.brokered_autocomplete(), Duration::ZERO);
    }
}
