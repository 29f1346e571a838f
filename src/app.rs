//! Application state and HTTP router construction.
//!
//! Mirrors the teacher's `app.rs` shape (a cloneable `AppState`, a single
//! `build_app` entry point layering CORS/tracing onto the router) with the
//! GraphQL/database plumbing replaced by the query runtime's own handles.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::index::IndexSet;
use crate::providers::ProviderClients;

/// Shared state for every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub index: Arc<IndexSet>,
    pub providers: Arc<ProviderClients>,

    /// Bounded `spawn_blocking` permit budget shared by every collection's
    /// searches (§5 "index connection is a pool... default 10").
    pub index_permits: Arc<Semaphore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, index: IndexSet, providers: ProviderClients) -> Self {
        let index_permits = Arc::new(Semaphore::new(config.index_pool_size));
        Self {
            config: Arc::new(config),
            index: Arc::new(index),
            providers: Arc::new(providers),
            index_permits,
        }
    }
}

/// Build the full Axum router: `/api/*` plus health endpoints, CORS and
/// tracing layers. Returns `Router<()>` (state fully applied) for `axum::serve`.
pub fn build_app(state: AppState) -> Router<()> {
    let api = Router::new()
        .route("/autocomplete", get(crate::api::autocomplete::autocomplete))
        .route(
            "/autocomplete/stream",
            get(crate::api::autocomplete::autocomplete_stream),
        )
        .route("/search", get(crate::api::search::search))
        .route("/search/stream", get(crate::api::search::search_stream))
        .route("/details", post(crate::api::details::details));

    Router::new()
        .nest("/api", api)
        .merge(crate::api::health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
