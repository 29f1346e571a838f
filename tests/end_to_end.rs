//! End-to-end scenarios against the built `axum` router (§8), driven over
//! an in-memory tantivy index seeded with the fixed demo documents.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use mediasearch::config::Config;
use mediasearch::index::{seed, IndexSet};
use mediasearch::providers::ProviderClients;
use mediasearch::{build_app, AppState};

fn test_config() -> Config {
    // SAFETY-free: these are placeholder hosts, never actually reached for
    // autocomplete requests (brokered deadline is zero there); search
    // requests that do reach them simply fail fast and are absorbed, per
    // the brokered-adapter-failure contract.
    Config::from_env().unwrap_or_else(|_| panic!("Config::from_env should always succeed with defaults"))
}

fn build_test_app() -> axum::Router {
    let index = IndexSet::open_in_memory().expect("in-memory index opens");
    seed::seed_demo_data(&index).expect("demo data seeds");
    let config = test_config();
    let providers = ProviderClients::from_config(&config.providers);
    let state = AppState::new(config, index, providers);
    build_app(state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn autocomplete_office_returns_tv_match_and_empty_brokered_arrays() {
    let app = build_test_app();
    let (status, body) = get_json(app, "/api/autocomplete?q=office").await;
    assert_eq!(status, StatusCode::OK);

    let tv = body["tv"].as_array().expect("tv array present");
    assert!(
        tv.iter().take(5).any(|item| item["search_title"] == "The Office" && item["mc_type"] == "tv"),
        "expected The Office in the first 5 tv results, got {tv:?}"
    );

    for source in ["news", "video", "ratings", "artist", "album"] {
        assert_eq!(body[source].as_array().unwrap().len(), 0, "{source} must be empty for autocomplete");
    }
}

#[tokio::test]
async fn search_brad_pitt_arbitrates_an_exact_person_match() {
    let app = build_test_app();
    let (status, body) = get_json(app, "/api/search?q=Brad%20Pitt").await;
    assert_eq!(status, StatusCode::OK);

    let exact_match = &body["exact_match"];
    assert_eq!(exact_match["mc_type"], "person");
    assert_eq!(exact_match["mc_subtype"], "actor");
    assert_eq!(exact_match["search_title"], "Brad Pitt");

    let person = body["person"].as_array().expect("person array present");
    assert_eq!(person[0]["search_title"], "Brad Pitt");
}

#[tokio::test]
async fn search_unmatched_query_returns_all_empty_arrays_and_null_exact_match() {
    let app = build_test_app();
    let (status, body) = get_json(app, "/api/search?q=xyzqqqnotathing1234").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["exact_match"].is_null());

    for source in ["tv", "movie", "person", "podcast", "author", "book", "news", "video", "ratings", "artist", "album"] {
        assert_eq!(body[source].as_array().unwrap().len(), 0, "{source} must be empty");
    }
}

#[tokio::test]
async fn autocomplete_person_hint_scopes_to_the_person_collection() {
    let app = build_test_app();
    let (status, body) = get_json(app, "/api/autocomplete?q=person%3Atom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_hint"], serde_json::json!(["person"]));

    for source in ["tv", "movie", "podcast", "book", "author"] {
        assert_eq!(body[source].as_array().unwrap().len(), 0, "{source} must be empty under a person hint");
    }
    assert!(!body["person"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn limit_zero_yields_empty_arrays_for_every_source() {
    let app = build_test_app();
    let (status, body) = get_json(app, "/api/search?q=dune&limit=0").await;
    assert_eq!(status, StatusCode::OK);
    for source in ["tv", "movie", "person", "podcast", "author", "book", "news", "video", "ratings", "artist", "album"] {
        assert_eq!(body[source].as_array().unwrap().len(), 0, "{source} must be empty at limit=0");
    }
}

#[tokio::test]
async fn search_stream_emits_movie_result_exact_match_and_a_single_terminal_done() {
    let app = build_test_app();
    let response = app
        .oneshot(Request::builder().uri("/api/search/stream?q=dune").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).expect("SSE body is UTF-8");

    let done_count = body.matches("event: done").count();
    assert_eq!(done_count, 1, "exactly one done event, got body:\n{body}");

    let last_event_offset = body.rfind("event:").expect("at least one event");
    assert!(body[last_event_offset..].starts_with("event: done"), "done must be the last event");

    assert!(body.contains("event: result"), "at least one result event expected");
    assert!(body.contains("\"search_title\":\"Dune\""), "a Dune result payload expected somewhere in the stream");

    assert!(body.contains("event: exact_match"), "an exact_match event is expected for this query");
    let exact_match_offset = body.find("event: exact_match").unwrap();
    let exact_match_data_line = body[exact_match_offset..]
        .lines()
        .find(|line| line.starts_with("data:"))
        .expect("exact_match event has a data line");
    assert!(exact_match_data_line.contains("\"mc_type\":\"movie\""), "priority order should pick the movie exact match");
}

#[tokio::test]
async fn details_resolves_a_known_mc_id() {
    let app = build_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/details")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({"mc_id": "movie_tmdb_438631"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["mc_id"], "movie_tmdb_438631");
    assert_eq!(body["search_title"], "Dune");
}

#[tokio::test]
async fn details_unknown_mc_id_is_404() {
    let app = build_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/details")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({"mc_id": "movie_tmdb_doesnotexist"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn details_malformed_mc_id_is_400() {
    let app = build_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/details")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({"mc_id": "nounderscorehere"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_query_returns_all_empty_envelope_with_200() {
    let app = build_test_app();
    let (status, body) = get_json(app, "/api/autocomplete?q=").await;
    assert_eq!(status, StatusCode::OK);
    for source in ["tv", "movie", "person", "podcast", "author", "book"] {
        assert_eq!(body[source].as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn healthz_and_readyz_report_ok() {
    let app = build_test_app();
    let (status, _) = get_json(app.clone(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get_json(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}
