//! Transport — Stream (C11): an SSE stream of `result` / `exact_match` /
//! `done` events, fed by a bounded `mpsc` channel and drained into
//! `axum::response::sse::Sse`, the same shape the `wonrax-website`
//! recommendation stream uses (broadcast there, `mpsc` here since this
//! stream is per-request rather than a shared feed).

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::models::{Item, Mode};
use crate::orchestrator::{self, FanOutInput};
use crate::query::ParsedQuery;

const CHANNEL_CAPACITY: usize = 32;
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// One SSE payload. See §4.11 for the ordering contract (`done` always
/// last; `result` in any order; `exact_match` at most once, never after
/// `done`) — enforced by [`crate::orchestrator::fanout::run_streaming`].
pub enum SseEvent {
    Result {
        source: String,
        results: Vec<Item>,
        latency_ms: u64,
    },
    ExactMatch(serde_json::Value),
    Done {
        source_hint: Option<Vec<String>>,
    },
}

#[derive(Serialize)]
struct ResultPayload<'a> {
    source: &'a str,
    results: &'a [Item],
    latency_ms: u64,
}

#[derive(Serialize)]
struct DonePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    source_hint: Option<Vec<String>>,
}

impl SseEvent {
    fn into_event(self) -> Event {
        match self {
            Self::Result { source, results, latency_ms } => Event::default()
                .event("result")
                .json_data(ResultPayload { source: &source, results: &results, latency_ms })
                .unwrap_or_else(|_| Event::default().event("result").data("{}")),
            Self::ExactMatch(value) => Event::default()
                .event("exact_match")
                .json_data(value)
                .unwrap_or_else(|_| Event::default().event("exact_match").data("null")),
            Self::Done { source_hint } => Event::default()
                .event("done")
                .json_data(DonePayload { source_hint })
                .unwrap_or_else(|_| Event::default().event("done").data("{}")),
        }
    }
}

/// Build the SSE response for a single query. The returned stream closes
/// itself once `done` has been sent (the producer task drops its sender).
pub fn run(
    state: &AppState,
    parsed: ParsedQuery,
    mode: Mode,
    limit: usize,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = tokio::sync::mpsc::channel(CHANNEL_CAPACITY);

    let index = state.index.clone();
    let providers = state.providers.clone();
    let deadlines = state.config.deadlines;
    let index_permits = state.index_permits.clone();

    tokio::spawn(async move {
        let input = FanOutInput {
            index: &index,
            providers: &providers,
            deadlines: &deadlines,
            index_permits,
            parsed: &parsed,
            mode,
            limit,
            cancel: CancellationToken::new(),
        };
        orchestrator::run_streaming(input, tx).await;
    });

    let stream = ReceiverStream::new(rx).map(|event| Ok(event.into_event()));
    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}
