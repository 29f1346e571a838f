//! Wire-level data model: [`Item`] variants, brokered-item envelopes, and the
//! request/response shapes exposed over HTTP.
//!
//! Every field here mirrors the public contract; nothing is introduced that
//! the query runtime doesn't actually populate.

use serde::{Deserialize, Serialize};

/// The fixed set of source tags, in the exact-match priority order used by
/// [`crate::scoring::exact_match`].
pub const SOURCE_PRIORITY: &[&str] = &["movie", "tv", "person", "podcast", "book", "author"];

/// Source tags that are excluded from autocomplete responses.
pub const BROKERED_SOURCES: &[&str] = &["news", "video", "ratings", "artist", "album"];

/// All source tags the parser recognizes as a `<token>:` hint prefix.
pub const KNOWN_SOURCE_TAGS: &[&str] = &[
    "tv", "movie", "person", "podcast", "author", "book", "news", "video", "ratings", "artist",
    "album",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McType {
    Movie,
    Tv,
    Person,
    Podcast,
    Book,
    NewsArticle,
    Video,
    MusicAlbum,
}

impl McType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
            Self::Podcast => "podcast",
            Self::Book => "book",
            Self::NewsArticle => "news_article",
            Self::Video => "video",
            Self::MusicAlbum => "music_album",
        }
    }
}

/// Cast credit restructured for the exact-match payload (§4.8): a display
/// name zipped positionally with its id, where a missing id becomes `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastCredit {
    pub name: String,
    pub id: Option<String>,
}

/// Base shape shared by every result, regardless of source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Item {
    pub mc_id: String,
    pub mc_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_subtype: Option<String>,
    pub source: String,
    pub source_id: String,
    pub search_title: String,
    pub popularity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,

    /// Lowercased, trimmed, punctuation-stripped `search_title`, precomputed
    /// at normalization time (§4.5, §9 design note) so the exact-match
    /// arbiter never re-normalizes.
    #[serde(skip)]
    pub canonical_name: String,

    #[serde(flatten)]
    pub fields: TypeFields,
}

/// Per-type structured fields, flattened onto [`Item`] at serialization time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TypeFields {
    Media(MediaFields),
    Person(PersonFields),
    Podcast(PodcastFields),
    Book(BookFields),
    Author(AuthorFields),
    Brokered(BrokeredFields),
    None {},
}

impl Default for TypeFields {
    fn default() -> Self {
        Self::None {}
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DirectorRef {
    pub name: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MediaFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub cast_names: Vec<String>,
    #[serde(default)]
    pub cast_ids: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<DirectorRef>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_air_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<i32>,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub created_by: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_status: Option<String>,
    #[serde(default)]
    pub watch_providers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_for_department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deathday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    pub is_deceased: bool,
    #[serde(default)]
    pub known_for_titles: Vec<String>,
    /// Pipe-separated alternate names, per §3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PodcastFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itunes_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podcast_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CoverUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub isbn: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_isbn13: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub subjects_normalized: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<i32>,
    #[serde(default)]
    pub cover_urls: CoverUrls,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AuthorFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openlibrary_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

/// Common envelope shared by every brokered item type (§3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BrokeredFields {
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub metrics: std::collections::BTreeMap<String, f64>,
    #[serde(default)]
    pub external_ids: std::collections::BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub sort_order: i64,
}

/// Query parameters shared by `/api/autocomplete` and `/api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestParams {
    #[serde(default)]
    pub q: String,
    pub sources: Option<String>,
    pub filters: Option<String>,
    #[serde(default)]
    pub raw: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Autocomplete,
    Search,
}

/// Fixed-key response envelope (§3). Every field is always present; arrays
/// default to empty rather than being omitted.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ResponseEnvelope {
    /// The arbitrated exact match (§4.8), pre-serialized to [`serde_json::Value`]
    /// because media exact matches restructure `cast` from plain names into
    /// `{name, id}` pairs — a shape no array entry of the same source ever
    /// takes, so it doesn't belong on [`Item`] itself.
    pub exact_match: Option<serde_json::Value>,
    pub tv: Vec<Item>,
    pub movie: Vec<Item>,
    pub person: Vec<Item>,
    pub podcast: Vec<Item>,
    pub author: Vec<Item>,
    pub book: Vec<Item>,
    pub news: Vec<Item>,
    pub video: Vec<Item>,
    pub ratings: Vec<Item>,
    pub artist: Vec<Item>,
    pub album: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<Vec<String>>,
}

impl ResponseEnvelope {
    /// Immutable accessor for the array belonging to `source`, or `None` for
    /// an unknown tag. Used by [`crate::scoring::exact_match`] to walk the
    /// priority ladder without caring about each field's name.
    #[must_use]
    pub fn array(&self, source: &str) -> Option<&Vec<Item>> {
        match source {
            "tv" => Some(&self.tv),
            "movie" => Some(&self.movie),
            "person" => Some(&self.person),
            "podcast" => Some(&self.podcast),
            "author" => Some(&self.author),
            "book" => Some(&self.book),
            "news" => Some(&self.news),
            "video" => Some(&self.video),
            "ratings" => Some(&self.ratings),
            "artist" => Some(&self.artist),
            "album" => Some(&self.album),
            _ => None,
        }
    }

    /// Mutable accessor for the array belonging to `source`, or `None` for
    /// an unknown tag. `exact_match`/`source_hint` are handled separately.
    pub fn array_mut(&mut self, source: &str) -> Option<&mut Vec<Item>> {
        match source {
            "tv" => Some(&mut self.tv),
            "movie" => Some(&mut self.movie),
            "person" => Some(&mut self.person),
            "podcast" => Some(&mut self.podcast),
            "author" => Some(&mut self.author),
            "book" => Some(&mut self.book),
            "news" => Some(&mut self.news),
            "video" => Some(&mut self.video),
            "ratings" => Some(&mut self.ratings),
            "artist" => Some(&mut self.artist),
            "album" => Some(&mut self.album),
            _ => None,
        }
    }
}

/// Body for `POST /api/details`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsRequest {
    pub mc_id: String,
    #[serde(default)]
    pub rss_details: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DetailsResponse {
    Media(Item),
    Person(Item),
    Podcast(Item),
    Author(Item),
    Book(Item),
    Error(DetailsErrorResponse),
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsErrorResponse {
    pub error: String,
    pub mc_id: String,
}
