//! `POST /api/details` handler (§6 implementation note): resolves an
//! `mc_id` by its `<collection>_<source>_<sourceId>` prefix and looks it up
//! directly in the matching tantivy collection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::index::executor;
use crate::index::normalizer::{self, RawDocument};
use crate::models::{DetailsErrorResponse, DetailsRequest, DetailsResponse};

/// Dispatch the id lookup to the collection named by `tag`, or `None` if
/// `tag` doesn't name one of the six indexed collections.
async fn lookup_collection(
    state: &AppState,
    tag: &str,
    mc_id: String,
) -> Option<crate::error::Result<Option<RawDocument>>> {
    match tag {
        "movie" => Some(
            executor::lookup_by_id(state.index.movie.reader.clone(), state.index.movie.fields.common, mc_id).await,
        ),
        "tv" => Some(executor::lookup_by_id(state.index.tv.reader.clone(), state.index.tv.fields.common, mc_id).await),
        "person" => Some(
            executor::lookup_by_id(state.index.person.reader.clone(), state.index.person.fields.common, mc_id).await,
        ),
        "podcast" => Some(
            executor::lookup_by_id(state.index.podcast.reader.clone(), state.index.podcast.fields.common, mc_id)
                .await,
        ),
        "book" => Some(executor::lookup_by_id(state.index.book.reader.clone(), state.index.book.fields.common, mc_id).await),
        "author" => Some(
            executor::lookup_by_id(state.index.author.reader.clone(), state.index.author.fields.common, mc_id).await,
        ),
        _ => None,
    }
}

pub async fn details(
    State(state): State<AppState>,
    Json(req): Json<DetailsRequest>,
) -> (StatusCode, Json<DetailsResponse>) {
    let Some((tag, _)) = req.mc_id.split_once('_') else {
        let error = crate::error::ParseError::MalformedId(req.mc_id.clone()).to_string();
        return (
            StatusCode::BAD_REQUEST,
            Json(DetailsResponse::Error(DetailsErrorResponse { error, mc_id: req.mc_id })),
        );
    };

    let Some(lookup_result) = lookup_collection(&state, tag, req.mc_id.clone()).await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(DetailsResponse::Error(DetailsErrorResponse {
                error: "unknown source prefix".to_string(),
                mc_id: req.mc_id,
            })),
        );
    };

    let raw = match lookup_result {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(error = %err, mc_id = %req.mc_id, "details lookup failed");
            None
        }
    };

    let Some(raw) = raw else {
        return (
            StatusCode::NOT_FOUND,
            Json(DetailsResponse::Error(DetailsErrorResponse {
                error: "unknown mc_id".to_string(),
                mc_id: req.mc_id,
            })),
        );
    };

    // `rss_details=true` only matters for mc_type=podcast, and even there it
    // returns the stored fields verbatim: live RSS-feed resolution is
    // ingestion-side work and out of scope for this crate (§6 implementation
    // note).
    let _ = req.rss_details;

    let item = normalizer::normalize(raw);
    let response = match tag {
        "movie" | "tv" => DetailsResponse::Media(item),
        "person" => DetailsResponse::Person(item),
        "podcast" => DetailsResponse::Podcast(item),
        "book" => DetailsResponse::Book(item),
        "author" => DetailsResponse::Author(item),
        _ => unreachable!("tag already validated by lookup_collection"),
    };

    (StatusCode::OK, Json(response))
}
