//! Document Normalizer (C5) — map a raw stored document to the public
//! [`Item`] shape (§4.5).
//!
//! Grounded in the teacher's `services::filename_parser` field-mapping
//! style: a single pure function, no I/O, total over any well-formed input.

use serde::{Deserialize, Serialize};

use crate::models::{Item, TypeFields};
use crate::query::tags;

/// The shape persisted in a collection's `payload` field (§6 "Index schema").
/// Bootstrap/ETL tooling outside this crate produces these; this crate only
/// ever reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub mc_type: String,
    #[serde(default)]
    pub mc_subtype: Option<String>,
    pub source: String,
    pub source_id: String,
    /// Either or both of `title`/`search_title` may be present; see the
    /// swap rule in [`normalize`].
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub search_title: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(flatten)]
    pub fields: TypeFields,
}

/// Map a [`RawDocument`] to the public [`Item`] shape.
///
/// - Injects `mc_id` = `id` (§4.5 bullet 1).
/// - Resolves `title`/`search_title` by the swap rule (§4.5 bullet 2): the
///   display name is `search_title` if present, else `title`. This crate's
///   wire model has no separate `title` field, so the "copy search_title →
///   title" branch has no observable effect here; it is honored in spirit by
///   never losing whichever of the two was actually supplied.
/// - Never introduces a field absent from `raw` (§4.5 bullet 4): every
///   [`Item`] field below is copied straight across, none synthesized.
/// - Precomputes `canonical_name` for the exact-match arbiter (§9 design
///   note), reusing the tag normalizer's total, idempotent folding.
#[must_use]
pub fn normalize(raw: RawDocument) -> Item {
    let search_title = raw
        .search_title
        .or(raw.title)
        .unwrap_or_default();
    let canonical_name = tags::normalize(&search_title);

    Item {
        mc_id: raw.id,
        mc_type: raw.mc_type,
        mc_subtype: raw.mc_subtype,
        source: raw.source,
        source_id: raw.source_id,
        search_title,
        popularity: raw.popularity,
        rating: raw.rating,
        image: raw.image,
        overview: raw.overview,
        canonical_name,
        fields: raw.fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaFields;

    fn raw(title: Option<&str>, search_title: Option<&str>) -> RawDocument {
        RawDocument {
            id: "movie_tmdb_42".to_string(),
            mc_type: "movie".to_string(),
            mc_subtype: None,
            source: "tmdb".to_string(),
            source_id: "42".to_string(),
            title: title.map(str::to_string),
            search_title: search_title.map(str::to_string),
            popularity: 50.0,
            rating: Some(7.5),
            image: None,
            overview: None,
            fields: TypeFields::Media(MediaFields::default()),
        }
    }

    #[test]
    fn injects_mc_id_from_raw_id() {
        let item = normalize(raw(Some("Dune"), None));
        assert_eq!(item.mc_id, "movie_tmdb_42");
    }

    #[test]
    fn prefers_search_title_when_both_present() {
        let item = normalize(raw(Some("Dune (2021)"), Some("Dune")));
        assert_eq!(item.search_title, "Dune");
    }

    #[test]
    fn falls_back_to_title_when_search_title_absent() {
        let item = normalize(raw(Some("Dune"), None));
        assert_eq!(item.search_title, "Dune");
    }

    #[test]
    fn never_introduces_fields_absent_from_raw() {
        let item = normalize(raw(Some("Dune"), None));
        assert!(item.rating.is_some());
        assert!(item.image.is_none());
        assert!(item.overview.is_none());
    }

    #[test]
    fn canonical_name_is_precomputed_and_normalized() {
        let item = normalize(raw(None, Some("The Office!")));
        assert_eq!(item.canonical_name, "the_office");
    }
}
