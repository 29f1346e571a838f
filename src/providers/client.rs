//! Brokered provider HTTP client: a [`RateLimitedClient`] plus a base URL,
//! optional API key, and [`RetryConfig`], one per external source.
//!
//! Grounded in `services::tmdb::TmdbClient`'s composition of the same three
//! pieces; this is the shared shape every concrete provider (news/video/
//! ratings/artist/album) is built from.

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::services::rate_limiter::{RateLimitConfig, RateLimitedClient, RetryConfig};

#[derive(Clone)]
pub struct ProviderClient {
    pub http: Arc<RateLimitedClient>,
    pub base_url: String,
    pub api_key: Option<String>,
    pub retry: RetryConfig,
}

impl ProviderClient {
    fn new(name: &'static str, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: Arc::new(RateLimitedClient::new(name, RateLimitConfig::default())),
            base_url,
            api_key,
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn news(cfg: &ProviderConfig) -> Self {
        Self::new("news", cfg.news_base_url.clone(), cfg.news_api_key.clone())
    }

    #[must_use]
    pub fn video(cfg: &ProviderConfig) -> Self {
        Self::new("video", cfg.video_base_url.clone(), cfg.video_api_key.clone())
    }

    #[must_use]
    pub fn ratings(cfg: &ProviderConfig) -> Self {
        Self::new("ratings", cfg.ratings_base_url.clone(), cfg.ratings_api_key.clone())
    }

    #[must_use]
    pub fn artist(cfg: &ProviderConfig) -> Self {
        Self::new("artist", cfg.artist_base_url.clone(), cfg.artist_api_key.clone())
    }

    #[must_use]
    pub fn album(cfg: &ProviderConfig) -> Self {
        Self::new("album", cfg.album_base_url.clone(), cfg.album_api_key.clone())
    }
}
