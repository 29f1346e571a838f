//! Transport — Batch (C10): block until every source is terminal, emit one
//! JSON envelope.

use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::error::{AppError, IndexError};
use crate::models::{Mode, ResponseEnvelope};
use crate::orchestrator::{self, FanOutInput};
use crate::query::ParsedQuery;

/// Run the fan-out to completion (or the request-wide deadline, whichever
/// comes first) and return the assembled envelope.
///
/// Per §7, index-unavailable escapes as `AppError::IndexUnavailable` (mapped
/// to HTTP 503 by its `IntoResponse` impl); every other failure mode is
/// already absorbed into the envelope by the orchestrator.
pub async fn run(
    state: &AppState,
    parsed: &ParsedQuery,
    mode: Mode,
    limit: usize,
) -> Result<ResponseEnvelope, AppError> {
    let input = FanOutInput {
        index: &state.index,
        providers: &state.providers,
        deadlines: &state.config.deadlines,
        index_permits: state.index_permits.clone(),
        parsed,
        mode,
        limit,
        cancel: CancellationToken::new(),
    };

    let request_wide = state.config.deadlines.request_wide();
    let outcome = tokio::time::timeout(request_wide, orchestrator::run(input))
        .await
        .map_err(|_elapsed| {
            AppError::IndexUnavailable(IndexError::Unavailable(
                "request-wide deadline exceeded before every source reached a terminal state"
                    .to_string(),
            ))
        })?;

    if outcome.any_index_unavailable {
        return Err(AppError::IndexUnavailable(IndexError::Unavailable(
            "one or more indexed sources failed to execute their query".to_string(),
        )));
    }

    Ok(outcome.envelope)
}
