//! Fan-Out Orchestrator (C7) — launch every enabled source concurrently,
//! collect results into the response envelope, and arbitrate the exact
//! match (§4.7, §5).

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::DeadlineConfig;
use crate::index::executor::{self, ExecutedHit};
use crate::index::normalizer;
use crate::index::IndexSet;
use crate::models::{Item, Mode, ResponseEnvelope};
use crate::orchestrator::sources::{enabled_sources, SourceKind};
use crate::providers::ProviderClients;
use crate::query::builder;
use crate::query::parser::ParsedQuery;
use crate::query::tags;
use crate::scoring::{exact_match, popularity};

pub struct FanOutInput<'a> {
    pub index: &'a IndexSet,
    pub providers: &'a ProviderClients,
    pub deadlines: &'a DeadlineConfig,
    pub index_permits: Arc<Semaphore>,
    pub parsed: &'a ParsedQuery,
    pub mode: Mode,
    pub limit: usize,
    pub cancel: CancellationToken,
}

pub struct FanOutOutcome {
    pub envelope: ResponseEnvelope,
    pub any_timed_out: bool,
    /// Set when an indexed source's executor reported a query failure
    /// (§7 "index unavailable"). The batch transport maps this to HTTP 503;
    /// brokered-adapter failures never set this (they're absorbed per §4.6).
    pub any_index_unavailable: bool,
}

/// `(tag, items, timed_out, index_unavailable)` — what every per-source task
/// returns to the join loop, regardless of whether it's indexed or brokered.
type SourceResult = (&'static str, Vec<Item>, bool, bool);

/// Launch one task per enabled source and return the `JoinSet` draining them.
/// Shared by the batch (`run`) and streaming (`run_streaming`) drivers so the
/// source-dispatch table lives in exactly one place.
fn spawn_tasks(input: &FanOutInput<'_>) -> tokio::task::JoinSet<SourceResult> {
    let sources_filter = input
        .parsed
        .source_hint
        .clone()
        .filter(|h| !h.is_empty());
    let enabled = enabled_sources(input.mode, None, sources_filter.as_deref());

    let index_deadline = match input.mode {
        Mode::Autocomplete => input.deadlines.index_autocomplete,
        Mode::Search => input.deadlines.index_search,
    };
    let brokered_deadline = match input.mode {
        Mode::Autocomplete => input.deadlines.brokered_autocomplete(),
        Mode::Search => input.deadlines.brokered_search,
    };

    let mut tasks = tokio::task::JoinSet::new();
    for descriptor in enabled {
        let tag = descriptor.tag;
        let kind = descriptor.kind;
        let text = input.parsed.text.clone();
        let filters = input.parsed.filters.clone();
        let cancel = input.cancel.child_token();
        let limit = input.limit;
        let mode = input.mode;

        match kind {
            SourceKind::Indexed => {
                let permits = input.index_permits.clone();
                match tag {
                    "movie" => {
                        let fields = input.index.movie.fields;
                        let index = input.index.movie.index.clone();
                        let reader = input.index.movie.reader.clone();
                        tasks.spawn(async move {
                            let built = builder::build_media_query(&text, &filters, &fields, mode);
                            let (items, timed_out, unavailable) = run_generic(
                                index, reader, fields.common, built, limit, index_deadline, permits, tag,
                            )
                            .await;
                            (tag, items, timed_out, unavailable)
                        });
                    }
                    "tv" => {
                        let fields = input.index.tv.fields;
                        let index = input.index.tv.index.clone();
                        let reader = input.index.tv.reader.clone();
                        tasks.spawn(async move {
                            let built = builder::build_media_query(&text, &filters, &fields, mode);
                            let (items, timed_out, unavailable) = run_generic(
                                index, reader, fields.common, built, limit, index_deadline, permits, tag,
                            )
                            .await;
                            (tag, items, timed_out, unavailable)
                        });
                    }
                    "person" => {
                        let fields = input.index.person.fields;
                        let index = input.index.person.index.clone();
                        let reader = input.index.person.reader.clone();
                        tasks.spawn(async move {
                            let built = builder::build_person_query(&text, &filters, &fields, mode);
                            let (items, timed_out, unavailable) = run_generic(
                                index, reader, fields.common, built, limit, index_deadline, permits, tag,
                            )
                            .await;
                            (tag, items, timed_out, unavailable)
                        });
                    }
                    "podcast" => {
                        let fields = input.index.podcast.fields;
                        let index = input.index.podcast.index.clone();
                        let reader = input.index.podcast.reader.clone();
                        tasks.spawn(async move {
                            let built = builder::build_podcast_query(&text, &filters, &fields, mode);
                            let (items, timed_out, unavailable) = run_generic(
                                index, reader, fields.common, built, limit, index_deadline, permits, tag,
                            )
                            .await;
                            (tag, items, timed_out, unavailable)
                        });
                    }
                    "book" => {
                        let fields = input.index.book.fields;
                        let index = input.index.book.index.clone();
                        let reader = input.index.book.reader.clone();
                        tasks.spawn(async move {
                            let built = builder::build_book_query(&text, &filters, &fields, mode);
                            let (items, timed_out, unavailable) = run_generic(
                                index, reader, fields.common, built, limit, index_deadline, permits, tag,
                            )
                            .await;
                            (tag, items, timed_out, unavailable)
                        });
                    }
                    "author" => {
                        let fields = input.index.author.fields;
                        let index = input.index.author.index.clone();
                        let reader = input.index.author.reader.clone();
                        tasks.spawn(async move {
                            let built = builder::build_author_query(&text, &filters, &fields, mode);
                            let (items, timed_out, unavailable) = run_generic(
                                index, reader, fields.common, built, limit, index_deadline, permits, tag,
                            )
                            .await;
                            (tag, items, timed_out, unavailable)
                        });
                    }
                    _ => unreachable!("indexed source table only names the six collections above"),
                }
            }
            SourceKind::Brokered => {
                let client = match tag {
                    "news" => input.providers.news.clone(),
                    "video" => input.providers.video.clone(),
                    "ratings" => input.providers.ratings.clone(),
                    "artist" => input.providers.artist.clone(),
                    "album" => input.providers.album.clone(),
                    _ => unreachable!("brokered source table only names the five providers above"),
                };
                tasks.spawn(async move {
                    let outcome = match tag {
                        "news" => crate::providers::news::fetch(&client, &text, limit, brokered_deadline, &cancel).await,
                        "video" => crate::providers::video::fetch(&client, &text, limit, brokered_deadline, &cancel).await,
                        "ratings" => crate::providers::ratings::fetch(&client, &text, limit, brokered_deadline, &cancel).await,
                        "artist" => crate::providers::artist::fetch(&client, &text, limit, brokered_deadline, &cancel).await,
                        "album" => crate::providers::album::fetch(&client, &text, limit, brokered_deadline, &cancel).await,
                        _ => unreachable!(),
                    };
                    if let Some(reason) = &outcome.error {
                        tracing::warn!(source = tag, duration_ms = outcome.latency_ms, reason = %reason, "brokered source failed");
                    }
                    let timed_out = outcome.timed_out;
                    let mut items = outcome.items;
                    for item in &mut items {
                        item.popularity = popularity::normalize(tag, item.popularity);
                    }
                    (tag, items, timed_out, false)
                });
            }
        }
    }

    tasks
}

/// Run every enabled source concurrently and assemble the response envelope.
pub async fn run(input: FanOutInput<'_>) -> FanOutOutcome {
    if input.limit == 0 {
        let mut envelope = ResponseEnvelope::default();
        envelope.source_hint = input.parsed.source_hint.clone();
        return FanOutOutcome {
            envelope,
            any_timed_out: false,
            any_index_unavailable: false,
        };
    }

    let mut tasks = spawn_tasks(&input);

    let mut envelope = ResponseEnvelope::default();
    envelope.source_hint = input.parsed.source_hint.clone();
    let mut any_timed_out = false;
    let mut any_index_unavailable = false;

    while let Some(joined) = tasks.join_next().await {
        let Ok((tag, items, timed_out, unavailable)) = joined else {
            any_timed_out = true;
            continue;
        };
        any_timed_out |= timed_out;
        any_index_unavailable |= unavailable;
        if let Some(slot) = envelope.array_mut(tag) {
            *slot = items;
        }
    }

    let query_canonical = tags::normalize(&input.parsed.text);
    envelope.exact_match = exact_match::arbitrate(&envelope, &query_canonical);

    FanOutOutcome { envelope, any_timed_out, any_index_unavailable }
}

/// Streaming counterpart of [`run`] (§4.11): emits one [`SseEvent::Result`]
/// per source as it terminates, at most one [`SseEvent::ExactMatch`], and
/// exactly one [`SseEvent::Done`] last. Consumed by `transport::stream`.
pub async fn run_streaming(
    input: FanOutInput<'_>,
    tx: tokio::sync::mpsc::Sender<crate::transport::stream::SseEvent>,
) {
    use crate::transport::stream::SseEvent;

    let source_hint = input.parsed.source_hint.clone();

    if input.limit == 0 {
        let _ = tx.send(SseEvent::Done { source_hint }).await;
        return;
    }

    let request_started = std::time::Instant::now();
    let mut tasks = spawn_tasks(&input);
    let mut envelope = ResponseEnvelope::default();
    let mut exact_match_sent = false;

    while let Some(joined) = tasks.join_next().await {
        let Ok((tag, items, _timed_out, _unavailable)) = joined else {
            continue;
        };
        if let Some(slot) = envelope.array_mut(tag) {
            *slot = items.clone();
        }
        let _ = tx
            .send(SseEvent::Result {
                source: tag.to_string(),
                results: items,
                latency_ms: request_started.elapsed().as_millis() as u64,
            })
            .await;

        if !exact_match_sent {
            let query_canonical = tags::normalize(&input.parsed.text);
            if let Some(candidate) = exact_match::arbitrate(&envelope, &query_canonical) {
                exact_match_sent = true;
                let _ = tx.send(SseEvent::ExactMatch(candidate)).await;
            }
        }
    }

    let _ = tx.send(SseEvent::Done { source_hint }).await;
}

async fn run_generic(
    index: tantivy::Index,
    reader: tantivy::IndexReader,
    common: crate::index::schema::CommonFields,
    built: Option<builder::BuiltQuery>,
    limit: usize,
    deadline: std::time::Duration,
    permits: Arc<Semaphore>,
    tag: &'static str,
) -> (Vec<Item>, bool, bool) {
    let Some(built) = built else {
        return (Vec::new(), false, false);
    };

    let result = match executor::execute(index, reader, common, built, limit, deadline, permits).await {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(source = tag, reason = %err, "index source unavailable");
            return (Vec::new(), false, true);
        }
    };

    let mut hits: Vec<ExecutedHit> = result.hits;
    executor::sort_hits(&mut hits);
    hits.truncate(limit);

    let items = hits
        .into_iter()
        .map(|hit| {
            let mut item = normalizer::normalize(hit.raw);
            item.popularity = popularity::normalize(tag, item.popularity);
            item
        })
        .collect();

    (items, result.timed_out, false)
}
