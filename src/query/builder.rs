//! Index Query Builder (C3) — turn a parsed query plus its tag filters into a
//! per-collection `tantivy` query, honoring each source's weighted full-text
//! clauses, tag constraints, and sort policy (§4.3).
//!
//! Grounded in `mcp-agent-mail-search-core::tantivy_schema`'s query
//! construction helpers: boosted per-field `BooleanQuery` clauses composed
//! with `Occur::Should`, tag constraints folded in as `Occur::Must`.

use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, RegexQuery, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::Term;

use crate::models::Mode;
use crate::query::parser::FilterClause;
use crate::query::tags;
use crate::index::schema::{AuthorFieldHandles, BookFieldHandles, MediaFieldHandles, PersonFieldHandles, PodcastFieldHandles};

/// How a collection's hits should be ordered once relevance-scored (§4.3
/// "sort: relevance, then &lt;tie-break field(s)&gt;").
#[derive(Debug, Clone, Copy)]
pub enum SortPolicy {
    /// Relevance, then the f64 popularity-like field, then an optional i64
    /// recency field (media: `year`).
    RelevanceThenPopularity {
        popularity: Field,
        recency: Option<Field>,
    },
}

pub struct BuiltQuery {
    pub query: Box<dyn Query>,
    pub sort: SortPolicy,
}

/// Minimum non-whitespace length for a free-text clause to be built at all
/// (§4.3 "queries under two characters with no filters are a no-op").
const MIN_TEXT_LEN: usize = 2;

/// Lowercase, alphanumeric-run tokenization mirroring the `SimpleTokenizer` +
/// `LowerCaser` chain registered in [`crate::index::schema::register_tokenizer`],
/// so terms built here land on the same term dictionary entries tantivy
/// produced at indexing time.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Build the weighted full-text clause for one field: every token but the
/// last as a required `TermQuery`, the last token as a prefix `RegexQuery`
/// when `mode` is [`Mode::Autocomplete`] (so "the offi" matches "the office"),
/// or as a plain required `TermQuery` for [`Mode::Search`].
fn field_clause(field: Field, tokens: &[String], mode: Mode, boost: f32) -> Option<Box<dyn Query>> {
    if tokens.is_empty() {
        return None;
    }
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let is_last = i == tokens.len() - 1;
        let term_query: Box<dyn Query> = if is_last && matches!(mode, Mode::Autocomplete) {
            Box::new(RegexQuery::from_pattern(&format!("{token}.*"), field).ok()?)
        } else {
            Box::new(TermQuery::new(
                Term::from_field_text(field, token),
                IndexRecordOption::Basic,
            ))
        };
        clauses.push((Occur::Must, term_query));
    }
    let inner: Box<dyn Query> = if clauses.len() == 1 {
        clauses.into_iter().next().unwrap().1
    } else {
        Box::new(BooleanQuery::new(clauses))
    };
    Some(Box::new(BoostQuery::new(inner, boost)))
}

/// A single tag constraint: exact-term match on a normalized token.
fn tag_constraint(field: Field, raw_value: &str) -> Box<dyn Query> {
    let normalized = tags::normalize(raw_value);
    Box::new(TermQuery::new(
        Term::from_field_text(field, &normalized),
        IndexRecordOption::Basic,
    ))
}

fn year_constraint(field: Field, raw_value: &str) -> Option<Box<dyn Query>> {
    let year: i64 = raw_value.trim().parse().ok()?;
    Some(Box::new(TermQuery::new(
        Term::from_field_i64(field, year),
        IndexRecordOption::Basic,
    )))
}

fn combine(text_clause: Option<Box<dyn Query>>, tag_clauses: Vec<Box<dyn Query>>) -> Option<Box<dyn Query>> {
    if text_clause.is_none() && tag_clauses.is_empty() {
        return None;
    }
    let mut must: Vec<(Occur, Box<dyn Query>)> = tag_clauses.into_iter().map(|q| (Occur::Must, q)).collect();
    if let Some(text) = text_clause {
        must.push((Occur::Must, text));
    }
    if must.len() == 1 {
        Some(must.into_iter().next().unwrap().1)
    } else {
        Some(Box::new(BooleanQuery::new(must)))
    }
}

#[must_use]
pub fn build_media_query(
    text: &str,
    filters: &[FilterClause],
    handles: &MediaFieldHandles,
    mode: Mode,
) -> Option<BuiltQuery> {
    let tokens = tokenize(text);
    let has_text = tokens.iter().map(String::len).sum::<usize>() >= MIN_TEXT_LEN;

    let mut field_clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    if has_text {
        if let Some(q) = field_clause(handles.common.search_title, &tokens, mode, 5.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.cast, &tokens, mode, 2.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.director, &tokens, mode, 2.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.keywords, &tokens, mode, 1.0) {
            field_clauses.push((Occur::Should, q));
        }
    }
    let text_clause: Option<Box<dyn Query>> = if field_clauses.is_empty() {
        None
    } else {
        Some(Box::new(BooleanQuery::new(field_clauses)))
    };

    let mut tag_clauses = Vec::new();
    for f in filters {
        let field = match f.field.as_str() {
            "genre" | "genres" => handles.genres,
            "country" | "origin_country" => handles.origin_country,
            "rating" | "us_rating" => handles.us_rating,
            "cast" => handles.cast_names,
            "year" => {
                if let Some(q) = year_constraint(handles.year, &f.value) {
                    tag_clauses.push(q);
                }
                continue;
            }
            _ => continue,
        };
        tag_clauses.push(tag_constraint(field, &f.value));
    }

    let query = combine(text_clause, tag_clauses)?;
    Some(BuiltQuery {
        query,
        sort: SortPolicy::RelevanceThenPopularity {
            popularity: handles.common.popularity_raw,
            recency: Some(handles.year),
        },
    })
}

#[must_use]
pub fn build_person_query(
    text: &str,
    filters: &[FilterClause],
    handles: &PersonFieldHandles,
    mode: Mode,
) -> Option<BuiltQuery> {
    let tokens = tokenize(text);
    let has_text = tokens.iter().map(String::len).sum::<usize>() >= MIN_TEXT_LEN;

    let mut field_clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    if has_text {
        if let Some(q) = field_clause(handles.common.search_title, &tokens, mode, 5.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.also_known_as, &tokens, mode, 2.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.known_for_titles, &tokens, mode, 1.0) {
            field_clauses.push((Occur::Should, q));
        }
    }
    let text_clause: Option<Box<dyn Query>> = if field_clauses.is_empty() {
        None
    } else {
        Some(Box::new(BooleanQuery::new(field_clauses)))
    };

    let mut tag_clauses = Vec::new();
    for f in filters {
        let field = match f.field.as_str() {
            "department" | "known_for_department" => handles.known_for_department,
            "subtype" | "mc_subtype" => handles.mc_subtype,
            _ => continue,
        };
        tag_clauses.push(tag_constraint(field, &f.value));
    }

    let query = combine(text_clause, tag_clauses)?;
    Some(BuiltQuery {
        query,
        sort: SortPolicy::RelevanceThenPopularity {
            popularity: handles.common.popularity_raw,
            recency: None,
        },
    })
}

#[must_use]
pub fn build_podcast_query(
    text: &str,
    filters: &[FilterClause],
    handles: &PodcastFieldHandles,
    mode: Mode,
) -> Option<BuiltQuery> {
    let tokens = tokenize(text);
    let has_text = tokens.iter().map(String::len).sum::<usize>() >= MIN_TEXT_LEN;

    let mut field_clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    if has_text {
        if let Some(q) = field_clause(handles.common.search_title, &tokens, mode, 5.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.author, &tokens, mode, 2.0) {
            field_clauses.push((Occur::Should, q));
        }
    }
    let text_clause: Option<Box<dyn Query>> = if field_clauses.is_empty() {
        None
    } else {
        Some(Box::new(BooleanQuery::new(field_clauses)))
    };

    let mut tag_clauses = Vec::new();
    for f in filters {
        let field = match f.field.as_str() {
            "category" | "categories" => handles.categories,
            "language" => handles.language,
            _ => continue,
        };
        tag_clauses.push(tag_constraint(field, &f.value));
    }

    let query = combine(text_clause, tag_clauses)?;
    Some(BuiltQuery {
        query,
        sort: SortPolicy::RelevanceThenPopularity {
            popularity: handles.common.popularity_raw,
            recency: None,
        },
    })
}

#[must_use]
pub fn build_book_query(
    text: &str,
    filters: &[FilterClause],
    handles: &BookFieldHandles,
    mode: Mode,
) -> Option<BuiltQuery> {
    let tokens = tokenize(text);
    let has_text = tokens.iter().map(String::len).sum::<usize>() >= MIN_TEXT_LEN;

    let mut field_clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    if has_text {
        if let Some(q) = field_clause(handles.common.search_title, &tokens, mode, 5.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.author_search, &tokens, mode, 2.0) {
            field_clauses.push((Occur::Should, q));
        }
        if let Some(q) = field_clause(handles.subjects_search, &tokens, mode, 1.0) {
            field_clauses.push((Occur::Should, q));
        }
    }
    let text_clause: Option<Box<dyn Query>> = if field_clauses.is_empty() {
        None
    } else {
        Some(Box::new(BooleanQuery::new(field_clauses)))
    };

    let mut tag_clauses = Vec::new();
    for f in filters {
        let field = match f.field.as_str() {
            "subject" | "subjects" => handles.subjects_normalized,
            "language" => handles.language,
            "year" | "first_publish_year" => {
                if let Some(q) = year_constraint(handles.first_publish_year, &f.value) {
                    tag_clauses.push(q);
                }
                continue;
            }
            _ => continue,
        };
        tag_clauses.push(tag_constraint(field, &f.value));
    }

    let query = combine(text_clause, tag_clauses)?;
    Some(BuiltQuery {
        query,
        sort: SortPolicy::RelevanceThenPopularity {
            popularity: handles.popularity_score,
            recency: Some(handles.first_publish_year),
        },
    })
}

#[must_use]
pub fn build_author_query(
    text: &str,
    _filters: &[FilterClause],
    handles: &AuthorFieldHandles,
    mode: Mode,
) -> Option<BuiltQuery> {
    let tokens = tokenize(text);
    let has_text = tokens.iter().map(String::len).sum::<usize>() >= MIN_TEXT_LEN;
    if !has_text {
        return None;
    }

    let mut field_clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    if let Some(q) = field_clause(handles.common.search_title, &tokens, mode, 5.0) {
        field_clauses.push((Occur::Should, q));
    }
    if let Some(q) = field_clause(handles.name, &tokens, mode, 4.0) {
        field_clauses.push((Occur::Should, q));
    }
    if field_clauses.is_empty() {
        return None;
    }
    let text_clause: Box<dyn Query> = Box::new(BooleanQuery::new(field_clauses));

    Some(BuiltQuery {
        query: text_clause,
        sort: SortPolicy::RelevanceThenPopularity {
            popularity: handles.quality_score,
            recency: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::schema::build_media_schema;

    #[test]
    fn short_query_with_no_filters_is_a_no_op() {
        let (_, handles) = build_media_schema();
        assert!(build_media_query("d", &[], &handles, Mode::Search).is_none());
        assert!(build_media_query("", &[], &handles, Mode::Search).is_none());
    }

    #[test]
    fn filter_only_query_is_built_even_with_empty_text() {
        let (_, handles) = build_media_schema();
        let filters = vec![FilterClause {
            field: "genre".to_string(),
            value: "drama".to_string(),
        }];
        assert!(build_media_query("", &filters, &handles, Mode::Search).is_some());
    }

    #[test]
    fn unknown_filter_field_is_silently_ignored() {
        let (_, handles) = build_media_schema();
        let filters = vec![FilterClause {
            field: "nonsense".to_string(),
            value: "x".to_string(),
        }];
        assert!(build_media_query("", &filters, &handles, Mode::Search).is_none());
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(tokenize("The Office!"), vec!["the", "office"]);
    }
}
