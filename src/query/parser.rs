//! Query Parser (C1) — split a raw query into `{source_hint?, filters[], text}`.
//!
//! Hand-rolled single-pass scanning over `&str`, in the style of the
//! teacher's `services::filename_parser`, falling back to `regex` only for
//! the bracketed-segment extraction (teacher precedent:
//! `services::legacy::text_utils` uses `Regex` for parenthetical stripping).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::KNOWN_SOURCE_TAGS;

/// Hard ceiling on raw query length (§7 "Parse... only pathological hints").
/// A query past this is rejected with `ParseError::TooLong` before any
/// source-hint/filter extraction runs.
pub const MAX_QUERY_LEN: usize = 512;

/// A single tag filter lifted out of the query text, e.g. `[genre=drama]` or
/// `keyword:"time travel"` becomes `FilterClause { field: "genre", value: "drama" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub source_hint: Option<Vec<String>>,
    pub filters: Vec<FilterClause>,
    pub text: String,
}

static FILTER_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[(?P<bfield>[A-Za-z0-9_]+)=(?P<bvalue>[^\]]*)\]|(?P<kfield>[A-Za-z0-9_]+):"(?P<kvalue>[^"]*)""#)
        .expect("filter segment regex is valid")
});

/// Parse a raw query string into its components. Never fails — the empty
/// string is a legal parse (§4.1).
#[must_use]
pub fn parse(raw: &str, bypass: bool) -> ParsedQuery {
    if bypass {
        return ParsedQuery {
            source_hint: None,
            filters: Vec::new(),
            text: raw.to_string(),
        };
    }

    let (source_hint, rest) = split_source_hint(raw);
    let (filters, remainder) = extract_filters(rest);
    let text = collapse_whitespace(remainder.trim());

    ParsedQuery {
        source_hint,
        filters,
        text,
    }
}

/// Split off a leading `<token>[,<token>...]:` hint prefix if every
/// comma-separated token matches the known source-tag set (case-insensitive).
fn split_source_hint(q: &str) -> (Option<Vec<String>>, &str) {
    let Some(colon_idx) = q.find(':') else {
        return (None, q);
    };
    let (candidate, rest) = q.split_at(colon_idx);
    let rest = &rest[1..]; // skip the colon itself

    // A hint prefix can't contain whitespace (it's a single token list).
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return (None, q);
    }

    let tokens: Vec<&str> = candidate.split(',').collect();
    let all_known = tokens
        .iter()
        .all(|t| KNOWN_SOURCE_TAGS.contains(&t.to_lowercase().as_str()));

    if all_known && !tokens.is_empty() {
        let hint = tokens.iter().map(|t| t.to_lowercase()).collect();
        (Some(hint), rest)
    } else {
        (None, q)
    }
}

/// Lift bracketed/keyword filter segments out of `text`, returning the
/// collected clauses and the text with those segments removed.
fn extract_filters(text: &str) -> (Vec<FilterClause>, String) {
    let mut filters = Vec::new();
    let remainder = FILTER_SEGMENT.replace_all(text, |caps: &regex::Captures| {
        if let (Some(field), Some(value)) = (caps.name("bfield"), caps.name("bvalue")) {
            filters.push(FilterClause {
                field: field.as_str().to_string(),
                value: value.as_str().to_string(),
            });
        } else if let (Some(field), Some(value)) = (caps.name("kfield"), caps.name("kvalue")) {
            filters.push(FilterClause {
                field: field.as_str().to_string(),
                value: value.as_str().to_string(),
            });
        }
        " "
    });
    (filters, remainder.into_owned())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text() {
        let p = parse("dune", false);
        assert_eq!(p.source_hint, None);
        assert!(p.filters.is_empty());
        assert_eq!(p.text, "dune");
    }

    #[test]
    fn parses_single_source_hint() {
        let p = parse("person:tom", false);
        assert_eq!(p.source_hint, Some(vec!["person".to_string()]));
        assert_eq!(p.text, "tom");
    }

    #[test]
    fn parses_multiple_comma_separated_hints() {
        let p = parse("tv,movie:star wars", false);
        assert_eq!(
            p.source_hint,
            Some(vec!["tv".to_string(), "movie".to_string()])
        );
        assert_eq!(p.text, "star wars");
    }

    #[test]
    fn unknown_prefix_is_not_treated_as_hint() {
        let p = parse("http://example.com", false);
        assert_eq!(p.source_hint, None);
        assert_eq!(p.text, "http://example.com");
    }

    #[test]
    fn extracts_bracket_filter() {
        let p = parse("dune [genre=scifi]", false);
        assert_eq!(p.text, "dune");
        assert_eq!(
            p.filters,
            vec![FilterClause {
                field: "genre".to_string(),
                value: "scifi".to_string()
            }]
        );
    }

    #[test]
    fn extracts_keyword_quoted_filter() {
        let p = parse(r#"time travel keyword:"time travel""#, false);
        assert_eq!(p.text, "time travel");
        assert_eq!(
            p.filters,
            vec![FilterClause {
                field: "keyword".to_string(),
                value: "time travel".to_string()
            }]
        );
    }

    #[test]
    fn collapses_internal_whitespace() {
        let p = parse("the    matrix", false);
        assert_eq!(p.text, "the matrix");
    }

    #[test]
    fn raw_bypasses_parsing_entirely() {
        let p = parse("  person:tom [genre=x]  ", true);
        assert_eq!(p.source_hint, None);
        assert!(p.filters.is_empty());
        assert_eq!(p.text, "  person:tom [genre=x]  ");
    }

    #[test]
    fn empty_string_is_a_legal_parse() {
        let p = parse("", false);
        assert_eq!(p.text, "");
        assert_eq!(p.source_hint, None);
        assert!(p.filters.is_empty());
    }
}
