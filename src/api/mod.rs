//! HTTP handlers (§6 "External interfaces").

pub mod autocomplete;
pub mod details;
pub mod health;
pub mod search;

use crate::error::{AppError, ParseError};
use crate::models::RequestParams;
use crate::query::parser::{self, FilterClause, MAX_QUERY_LEN};
use crate::query::ParsedQuery;

/// Default result cap per source when a request omits `limit`.
pub(crate) const DEFAULT_LIMIT: usize = 20;

/// Parse `params.q` and fold the explicit `sources`/`filters` query
/// parameters in on top of whatever the query text itself encodes (§6
/// "sources=<csv>&filters=<csv>"). Explicit parameters take priority over
/// anything the text-embedded hint/bracket syntax would have produced,
/// mirroring how a UI's source-picker and filter chips override free text.
pub(crate) fn parse_request(params: &RequestParams) -> Result<ParsedQuery, AppError> {
    if params.q.len() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest(ParseError::TooLong { max: MAX_QUERY_LEN }));
    }

    let mut parsed = parser::parse(&params.q, params.raw);

    if let Some(sources) = &params.sources {
        let hint: Vec<String> = sources
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !hint.is_empty() {
            parsed.source_hint = Some(hint);
        }
    }

    if let Some(filters) = &params.filters {
        for clause in filters.split(',') {
            if let Some((field, value)) = clause.split_once('=') {
                let field = field.trim();
                let value = value.trim();
                if !field.is_empty() {
                    parsed.filters.push(FilterClause {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
    }

    Ok(parsed)
}

pub(crate) fn resolve_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT)
}
