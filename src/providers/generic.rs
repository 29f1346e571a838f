//! Shared brokered-provider fetch/parse/error-translation logic (C6).
//!
//! Every concrete provider (news/video/ratings/artist/album) talks to a
//! differently-shaped upstream in reality; this crate models them with one
//! shared response contract (a JSON `{ "results": [...] }` envelope) since no
//! concrete upstream is specified — each thin wrapper in `providers::{news,
//! video, ratings, artist, album}` only supplies its `source`/`mc_type` tag
//! and a [`ProviderClient`]. Documented here rather than guessed per-provider
//! to avoid inventing upstream contracts that don't exist.
//!
//! Grounded in `services::tmdb::TmdbClient::search_movies` for the
//! rate-limited GET + `retry_async` composition, and in
//! `services::rss::validate_url_for_ssrf` for the "never raise, translate to
//! a structured error" discipline this module follows for every failure mode.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::models::{BrokeredFields, Item, TypeFields};
use crate::providers::client::ProviderClient;
use crate::services::rate_limiter::retry_async;

#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub items: Vec<Item>,
    pub latency_ms: u64,
    pub error: Option<String>,
    pub timed_out: bool,
}

impl ProviderOutcome {
    fn empty(latency_ms: u64, error: impl Into<String>, timed_out: bool) -> Self {
        Self {
            items: Vec::new(),
            latency_ms,
            error: Some(error.into()),
            timed_out,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenericResponse {
    #[serde(default)]
    results: Vec<GenericItem>,
}

#[derive(Debug, Deserialize)]
struct GenericItem {
    id: String,
    title: String,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Fetch up to `limit` items for `text` from `client`, honoring `deadline`
/// and `cancel` (§4.6). Never returns an `Err` — transport and HTTP failures
/// become `ProviderOutcome.error`, matching the "adapter MUST NOT raise"
/// contract.
pub async fn fetch(
    client: &ProviderClient,
    source: &'static str,
    mc_type: &'static str,
    text: &str,
    limit: usize,
    deadline: Duration,
    cancel: &CancellationToken,
) -> ProviderOutcome {
    if deadline.is_zero() {
        return ProviderOutcome::empty(0, "brokered search disabled for this mode", false);
    }

    let started = Instant::now();
    let request = fetch_with_retry(client, source, text, limit);

    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            return ProviderOutcome::empty(started.elapsed().as_millis() as u64, "cancelled", false);
        }
        result = tokio::time::timeout(deadline, request) => result,
    };

    let latency_ms = started.elapsed().as_millis() as u64;
    match result {
        Err(_elapsed) => {
            let err = ProviderError::Timeout { provider: source };
            ProviderOutcome::empty(latency_ms, err.to_string(), true)
        }
        Ok(Err(err)) => {
            let timed_out = matches!(err, ProviderError::Timeout { .. });
            ProviderOutcome::empty(latency_ms, err.to_string(), timed_out)
        }
        Ok(Ok(response)) => {
            let items = response
                .results
                .into_iter()
                .take(limit.max(1))
                .map(|raw| to_item(source, mc_type, raw))
                .collect();
            ProviderOutcome {
                items,
                latency_ms,
                error: None,
                timed_out: false,
            }
        }
    }
}

async fn fetch_with_retry(
    client: &ProviderClient,
    provider: &'static str,
    text: &str,
    limit: usize,
) -> Result<GenericResponse, ProviderError> {
    let retry = client.retry.clone();
    retry_async(
        || async {
            let query = [("q", text.to_string()), ("limit", limit.to_string())];
            let response = client
                .http
                .get_with_query(&client.base_url, &query)
                .await
                .map_err(|e| ProviderError::Transport { provider, message: e.to_string() })?;
            let status = response.status();
            if !status.is_success() {
                return Err(ProviderError::Http { provider, status: status.as_u16() });
            }
            response
                .json::<GenericResponse>()
                .await
                .map_err(|e| ProviderError::Transport { provider, message: e.to_string() })
        },
        &retry,
        "brokered-provider-fetch",
    )
    .await
}

fn to_item(source: &'static str, mc_type: &'static str, raw: GenericItem) -> Item {
    let GenericItem {
        id,
        title,
        popularity,
        image,
        url,
    } = raw;
    let mc_id = format!("{source}_{id}");
    let canonical_name = crate::query::tags::normalize(&title);
    Item {
        mc_id,
        mc_type: mc_type.to_string(),
        mc_subtype: None,
        source: source.to_string(),
        source_id: id,
        search_title: title,
        popularity: popularity.clamp(0.0, 100.0),
        rating: None,
        image,
        overview: None,
        canonical_name,
        fields: TypeFields::Brokered(BrokeredFields {
            links: url.into_iter().collect(),
            sort_order: 0,
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_item_clamps_popularity_into_range() {
        let item = to_item(
            "news",
            "news_article",
            GenericItem {
                id: "1".to_string(),
                title: "Breaking".to_string(),
                popularity: 250.0,
                image: None,
                url: None,
            },
        );
        assert_eq!(item.popularity, 100.0);
        assert_eq!(item.mc_id, "news_1");
    }
}
