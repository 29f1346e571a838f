//! `/api/autocomplete` and `/api/autocomplete/stream` handlers.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::Event;
use axum::response::Sse;
use axum::Json;
use axum_extra::extract::Query;
use futures::stream::Stream;

use crate::api::{parse_request, resolve_limit};
use crate::app::AppState;
use crate::error::AppError;
use crate::models::{Mode, RequestParams, ResponseEnvelope};
use crate::transport::{batch, stream};

pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let parsed = parse_request(&params)?;
    let limit = resolve_limit(params.limit);
    let envelope = batch::run(&state, &parsed, Mode::Autocomplete, limit).await?;
    Ok(Json(envelope))
}

pub async fn autocomplete_stream(
    State(state): State<AppState>,
    Query(params): Query<RequestParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let parsed = parse_request(&params)?;
    let limit = resolve_limit(params.limit);
    Ok(stream::run(&state, parsed, Mode::Autocomplete, limit))
}
