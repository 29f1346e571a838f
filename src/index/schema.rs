//! Tantivy schema definitions for the six indexed collections (§6 "Index
//! schema"): `tv`, `movie`, `person`, `podcast`, `book`, `author`.
//!
//! Grounded in `mcp-agent-mail-search-core::tantivy_schema`: a custom
//! tokenizer chain registered per index, STORED/FAST field handles returned
//! alongside the `Schema` so callers never have to re-resolve a field by name.

use tantivy::schema::{Field, IndexRecordOption, Schema, SchemaBuilder, TextFieldIndexing, TextOptions, FAST, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};
use tantivy::Index;

/// Tokenizer registered against every collection's index.
pub const TOKENIZER_NAME: &str = "mediasearch_default";

fn text_field_options() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    )
}

/// Register the shared tokenizer with a freshly opened/created index. Must
/// be called before any indexing or searching against that index.
pub fn register_tokenizer(index: &Index) {
    let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(64))
        .build();
    index.tokenizers().register(TOKENIZER_NAME, analyzer);
}

/// Fields shared by every collection: the stable id, the display title, a
/// JSON payload carrying the full raw document (so [`crate::index::normalizer`]
/// never has to reconstruct structured fields from flat tantivy values), and
/// the popularity raw score used by [`crate::scoring::popularity`].
#[derive(Debug, Clone, Copy)]
pub struct CommonFields {
    pub id: Field,
    pub search_title: Field,
    pub popularity_raw: Field,
    pub payload: Field,
}

fn add_common_fields(builder: &mut SchemaBuilder) -> CommonFields {
    CommonFields {
        id: builder.add_text_field("id", STRING | STORED | FAST),
        search_title: builder.add_text_field("search_title", text_field_options() | STORED),
        popularity_raw: builder.add_f64_field("popularity_raw", FAST | STORED),
        payload: builder.add_text_field("payload", STORED),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MediaFieldHandles {
    pub common: CommonFields,
    pub cast: Field,
    pub director: Field,
    pub keywords: Field,
    pub genres: Field,
    pub origin_country: Field,
    pub us_rating: Field,
    pub cast_names: Field,
    pub year: Field,
}

#[must_use]
pub fn build_media_schema() -> (Schema, MediaFieldHandles) {
    let mut builder = SchemaBuilder::new();
    let common = add_common_fields(&mut builder);
    let handles = MediaFieldHandles {
        cast: builder.add_text_field("cast", text_field_options()),
        director: builder.add_text_field("director", text_field_options()),
        keywords: builder.add_text_field("keywords", text_field_options()),
        genres: builder.add_text_field("genres", STRING | FAST | STORED),
        origin_country: builder.add_text_field("origin_country", STRING | FAST | STORED),
        us_rating: builder.add_text_field("us_rating", STRING | FAST | STORED),
        cast_names: builder.add_text_field("cast_names", STRING | FAST | STORED),
        year: builder.add_i64_field("year", FAST | STORED),
        common,
    };
    (builder.build(), handles)
}

#[derive(Debug, Clone, Copy)]
pub struct PersonFieldHandles {
    pub common: CommonFields,
    pub also_known_as: Field,
    pub known_for_titles: Field,
    pub mc_subtype: Field,
    pub known_for_department: Field,
}

#[must_use]
pub fn build_person_schema() -> (Schema, PersonFieldHandles) {
    let mut builder = SchemaBuilder::new();
    let common = add_common_fields(&mut builder);
    let handles = PersonFieldHandles {
        also_known_as: builder.add_text_field("also_known_as", text_field_options()),
        known_for_titles: builder.add_text_field("known_for_titles", text_field_options()),
        mc_subtype: builder.add_text_field("mc_subtype", STRING | FAST | STORED),
        known_for_department: builder.add_text_field("known_for_department", STRING | FAST | STORED),
        common,
    };
    (builder.build(), handles)
}

#[derive(Debug, Clone, Copy)]
pub struct PodcastFieldHandles {
    pub common: CommonFields,
    pub author: Field,
    pub categories: Field,
    pub language: Field,
}

#[must_use]
pub fn build_podcast_schema() -> (Schema, PodcastFieldHandles) {
    let mut builder = SchemaBuilder::new();
    let common = add_common_fields(&mut builder);
    let handles = PodcastFieldHandles {
        author: builder.add_text_field("author", text_field_options()),
        categories: builder.add_text_field("categories", STRING | FAST | STORED),
        language: builder.add_text_field("language", STRING | FAST | STORED),
        common,
    };
    (builder.build(), handles)
}

#[derive(Debug, Clone, Copy)]
pub struct BookFieldHandles {
    pub common: CommonFields,
    pub author_search: Field,
    pub subjects_search: Field,
    pub subjects_normalized: Field,
    pub language: Field,
    pub first_publish_year: Field,
    pub popularity_score: Field,
}

#[must_use]
pub fn build_book_schema() -> (Schema, BookFieldHandles) {
    let mut builder = SchemaBuilder::new();
    let common = add_common_fields(&mut builder);
    let handles = BookFieldHandles {
        author_search: builder.add_text_field("author_search", text_field_options()),
        subjects_search: builder.add_text_field("subjects_search", text_field_options()),
        subjects_normalized: builder.add_text_field("subjects_normalized", STRING | FAST | STORED),
        language: builder.add_text_field("language", STRING | FAST | STORED),
        first_publish_year: builder.add_i64_field("first_publish_year", FAST | STORED),
        popularity_score: builder.add_f64_field("popularity_score", FAST | STORED),
        common,
    };
    (builder.build(), handles)
}

#[derive(Debug, Clone, Copy)]
pub struct AuthorFieldHandles {
    pub common: CommonFields,
    pub name: Field,
    pub quality_score: Field,
}

#[must_use]
pub fn build_author_schema() -> (Schema, AuthorFieldHandles) {
    let mut builder = SchemaBuilder::new();
    let common = add_common_fields(&mut builder);
    let handles = AuthorFieldHandles {
        name: builder.add_text_field("name", text_field_options()),
        quality_score: builder.add_f64_field("quality_score", FAST | STORED),
        common,
    };
    (builder.build(), handles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_schema_has_expected_field_count() {
        let (schema, _) = build_media_schema();
        // 4 common + 8 media-specific
        assert_eq!(schema.fields().count(), 12);
    }

    #[test]
    fn author_schema_is_the_smallest() {
        let (schema, _) = build_author_schema();
        assert_eq!(schema.fields().count(), 6);
    }
}
