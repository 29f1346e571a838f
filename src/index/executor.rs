//! Index Executor (C4) — run a [`BuiltQuery`] against one collection with a
//! soft deadline, off the async executor (§4.4).
//!
//! Grounded in the teacher's pattern of keeping blocking work (`rapidfuzz`
//! scoring in `services::scanner`) off the tokio reactor via `spawn_blocking`;
//! the `spawn_blocking` permit budget is the "index connection pool" of §5
//! (implementation note, resolved in DESIGN.md).

use std::sync::Arc;
use std::time::Duration;

use tantivy::collector::TopDocs;
use tantivy::{Index, IndexReader};
use tokio::sync::Semaphore;

use crate::error::{AppError, IndexError, Result};
use crate::index::normalizer::RawDocument;
use crate::index::schema::CommonFields;
use crate::query::builder::BuiltQuery;

pub struct ExecutedHit {
    pub raw: RawDocument,
    pub score: f32,
    pub popularity: f64,
    pub recency: Option<i64>,
}

pub struct ExecutionResult {
    pub hits: Vec<ExecutedHit>,
    pub timed_out: bool,
}

/// Run `built` against `index`/`reader`, bounded by `deadline` and by
/// `permits` (the shared `spawn_blocking` budget across every collection).
///
/// On deadline overflow returns `ExecutionResult { hits: vec![], timed_out:
/// true }` rather than partial results: tantivy's blocking `Searcher::search`
/// call cannot be interrupted mid-flight once `spawn_blocking` has picked it
/// up, so "partial results" degrades to "no results, flagged", a conservative
/// reading of the §4.4 contract.
pub async fn execute(
    index: Index,
    reader: IndexReader,
    common: CommonFields,
    built: BuiltQuery,
    limit: usize,
    deadline: Duration,
    permits: Arc<Semaphore>,
) -> Result<ExecutionResult> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_| AppError::Internal("index permit semaphore closed".to_string()))?;

    let BuiltQuery { query, sort } = built;
    let (popularity_field, recency_field) = match sort {
        crate::query::builder::SortPolicy::RelevanceThenPopularity { popularity, recency } => {
            (popularity, recency)
        }
    };

    let search_task = tokio::task::spawn_blocking(move || -> Result<Vec<ExecutedHit>> {
        let searcher = reader.searcher();
        let top_docs = searcher
            .search(&*query, &TopDocs::with_limit(limit.max(1)))
            .map_err(IndexError::Query)?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: tantivy::TantivyDocument = searcher.doc(doc_address).map_err(IndexError::Query)?;
            let payload = doc
                .get_first(common.payload)
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            let Ok(raw) = serde_json::from_str::<RawDocument>(payload) else {
                continue;
            };
            let popularity = doc
                .get_first(popularity_field)
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let recency = recency_field.and_then(|f| doc.get_first(f).and_then(|v| v.as_i64()));
            hits.push(ExecutedHit {
                raw,
                score,
                popularity,
                recency,
            });
        }
        Ok(hits)
    });

    match tokio::time::timeout(deadline, search_task).await {
        Ok(Ok(Ok(hits))) => Ok(ExecutionResult {
            hits,
            timed_out: false,
        }),
        Ok(Ok(Err(err))) => Err(err),
        Ok(Err(join_err)) => Err(AppError::Internal(format!(
            "index search task panicked: {join_err}"
        ))),
        Err(_elapsed) => Ok(ExecutionResult {
            hits: Vec::new(),
            timed_out: true,
        }),
    }
}

/// Direct lookup of a single stored document by its `id` field (§6
/// `/api/details` implementation note): a `TermQuery` on the `STRING | FAST`
/// `id` field, O(1) rather than a scored full-text search. No deadline — a
/// single term lookup doesn't need one.
pub async fn lookup_by_id(
    reader: IndexReader,
    common: CommonFields,
    mc_id: String,
) -> Result<Option<RawDocument>> {
    tokio::task::spawn_blocking(move || -> Result<Option<RawDocument>> {
        let searcher = reader.searcher();
        let term = tantivy::Term::from_field_text(common.id, &mc_id);
        let query = tantivy::query::TermQuery::new(term, tantivy::schema::IndexRecordOption::Basic);
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(IndexError::Query)?;
        let Some((_score, doc_address)) = top_docs.into_iter().next() else {
            return Ok(None);
        };
        let doc: tantivy::TantivyDocument = searcher.doc(doc_address).map_err(IndexError::Query)?;
        let payload = doc
            .get_first(common.payload)
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Ok(serde_json::from_str::<RawDocument>(payload).ok())
    })
    .await
    .map_err(|join_err| AppError::Internal(format!("id lookup task panicked: {join_err}")))?
}

/// Deterministic tie-break applied after tantivy's relevance ordering:
/// relevance desc, then popularity desc, then recency desc (§4.3 sort lists).
pub fn sort_hits(hits: &mut [ExecutedHit]) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.popularity
                    .partial_cmp(&a.popularity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| b.recency.unwrap_or(i64::MIN).cmp(&a.recency.unwrap_or(i64::MIN)))
    });
}
