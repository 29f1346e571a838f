//! Demo/test fixture data: a handful of real-world-shaped documents covering
//! the §8 end-to-end scenarios ("The Office", "Dune", "Brad Pitt", ...).
//!
//! This is bootstrap/dev tooling, not the query runtime — the production ETL
//! that actually populates these indexes from upstream catalogs lives outside
//! this crate (§2 "External interfaces" treats the index as a read-only
//! contract). Exposed via `mediasearch-cli index seed` and reused by
//! integration tests.

use tantivy::doc;

use crate::index::normalizer::RawDocument;
use crate::index::store::IndexSet;
use crate::models::{CoverUrls, DirectorRef, MediaFields, PersonFields, TypeFields};
use crate::query::tags;

fn expand_tags(values: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for v in values {
        for expanded in tags::normalize_and_expand(v) {
            if !out.contains(&expanded) {
                out.push(expanded);
            }
        }
    }
    out
}

fn index_media(
    set_collection: &crate::index::store::Collection<crate::index::schema::MediaFieldHandles>,
    id: &str,
    source: &str,
    source_id: &str,
    search_title: &str,
    popularity: f64,
    year: i32,
    genres: &[&str],
    cast: &[&str],
    cast_ids: Vec<Option<String>>,
    director: Option<&str>,
) -> anyhow::Result<()> {
    let f = &set_collection.fields;
    let mut writer = set_collection.index.writer(15_000_000)?;

    let fields = MediaFields {
        year: Some(year),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        cast: cast.iter().map(|c| c.to_string()).collect(),
        cast_names: cast.iter().map(|c| c.to_string()).collect(),
        cast_ids,
        director: director.map(|d| DirectorRef {
            name: d.to_string(),
            id: None,
        }),
        ..Default::default()
    };
    let raw = RawDocument {
        id: id.to_string(),
        mc_type: if genres.contains(&"tv") { "tv".to_string() } else { "movie".to_string() },
        mc_subtype: None,
        source: source.to_string(),
        source_id: source_id.to_string(),
        title: None,
        search_title: Some(search_title.to_string()),
        popularity,
        rating: None,
        image: None,
        overview: None,
        fields: TypeFields::Media(fields),
    };
    let payload = serde_json::to_string(&raw)?;
    let genre_tags = expand_tags(genres);

    let mut document = doc!(
        f.common.id => id,
        f.common.search_title => search_title,
        f.common.popularity_raw => popularity,
        f.common.payload => payload,
        f.year => i64::from(year),
    );
    for c in cast {
        document.add_text(f.cast, c);
        document.add_text(f.cast_names, c);
    }
    if let Some(d) = director {
        document.add_text(f.director, d);
    }
    for g in &genre_tags {
        document.add_text(f.genres, g);
    }
    writer.add_document(document)?;
    writer.commit()?;
    set_collection.reader.reload()?;
    Ok(())
}

fn index_person(
    collection: &crate::index::store::Collection<crate::index::schema::PersonFieldHandles>,
    id: &str,
    source: &str,
    source_id: &str,
    search_title: &str,
    popularity: f64,
    mc_subtype: &str,
    known_for_department: &str,
) -> anyhow::Result<()> {
    let f = &collection.fields;
    let mut writer = collection.index.writer(15_000_000)?;

    let fields = PersonFields {
        known_for_department: Some(known_for_department.to_string()),
        is_deceased: false,
        ..Default::default()
    };
    let raw = RawDocument {
        id: id.to_string(),
        mc_type: "person".to_string(),
        mc_subtype: Some(mc_subtype.to_string()),
        source: source.to_string(),
        source_id: source_id.to_string(),
        title: None,
        search_title: Some(search_title.to_string()),
        popularity,
        rating: None,
        image: None,
        overview: None,
        fields: TypeFields::Person(fields),
    };
    let payload = serde_json::to_string(&raw)?;

    let document = doc!(
        f.common.id => id,
        f.common.search_title => search_title,
        f.common.popularity_raw => popularity,
        f.common.payload => payload,
        f.known_for_department => known_for_department,
        f.mc_subtype => mc_subtype,
    );
    writer.add_document(document)?;
    writer.commit()?;
    collection.reader.reload()?;
    Ok(())
}

/// Populate `set` with the fixed cast of example documents exercised by the
/// integration tests and by `mediasearch-cli demo`.
pub fn seed_demo_data(set: &IndexSet) -> anyhow::Result<()> {
    index_media(
        &set.tv,
        "tv_tvmaze_2316",
        "tvmaze",
        "2316",
        "The Office",
        78.0,
        2005,
        &["comedy", "tv"],
        &["Steve Carell", "John Krasinski"],
        vec![Some("person_tmdb_57144".to_string()), Some("person_tmdb_151720".to_string())],
        None,
    )?;

    index_media(
        &set.movie,
        "movie_tmdb_438631",
        "tmdb",
        "438631",
        "Dune",
        85.0,
        2021,
        &["science_fiction", "drama"],
        &["Timothee Chalamet", "Zendaya"],
        vec![Some("person_tmdb_976" .to_string()), None],
        Some("Denis Villeneuve"),
    )?;

    index_media(
        &set.tv,
        "tv_tvmaze_139",
        "tvmaze",
        "139",
        "Dune",
        12.0,
        2000,
        &["science_fiction", "tv"],
        &[],
        vec![],
        None,
    )?;

    index_person(
        &set.person,
        "person_tmdb_287",
        "tmdb",
        "287",
        "Brad Pitt",
        92.0,
        "actor",
        "Acting",
    )?;

    index_person(
        &set.person,
        "person_tmdb_31",
        "tmdb",
        "31",
        "Tom Hanks",
        88.0,
        "actor",
        "Acting",
    )?;

    seed_book(&set.book, "Dune", "Frank Herbert", 1965, &["science_fiction"], 91.0)?;
    seed_author(&set.author, "Frank Herbert", 70.0)?;
    seed_podcast(&set.podcast, "The Daily", "The New York Times", 95.0)?;

    Ok(())
}

fn seed_book(
    collection: &crate::index::store::Collection<crate::index::schema::BookFieldHandles>,
    search_title: &str,
    author: &str,
    first_publish_year: i32,
    subjects: &[&str],
    popularity_score: f64,
) -> anyhow::Result<()> {
    let f = &collection.fields;
    let mut writer = collection.index.writer(15_000_000)?;

    let fields = crate::models::BookFields {
        author: Some(author.to_string()),
        author_name: vec![author.to_string()],
        first_publish_year: Some(first_publish_year),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
        subjects_normalized: expand_tags(subjects),
        popularity_score: Some(popularity_score),
        cover_urls: CoverUrls::default(),
        ..Default::default()
    };
    let id = format!("book_openlibrary_{}", tags::normalize(search_title));
    let raw = RawDocument {
        id: id.clone(),
        mc_type: "book".to_string(),
        mc_subtype: None,
        source: "openlibrary".to_string(),
        source_id: tags::normalize(search_title),
        title: None,
        search_title: Some(search_title.to_string()),
        popularity: popularity_score,
        rating: None,
        image: None,
        overview: None,
        fields: TypeFields::Book(fields),
    };
    let payload = serde_json::to_string(&raw)?;

    let mut document = doc!(
        f.common.id => id,
        f.common.search_title => search_title,
        f.common.popularity_raw => popularity_score,
        f.common.payload => payload,
        f.author_search => author,
        f.popularity_score => popularity_score,
        f.first_publish_year => i64::from(first_publish_year),
    );
    for s in &expand_tags(subjects) {
        document.add_text(f.subjects_normalized, s);
    }
    writer.add_document(document)?;
    writer.commit()?;
    collection.reader.reload()?;
    Ok(())
}

fn seed_author(
    collection: &crate::index::store::Collection<crate::index::schema::AuthorFieldHandles>,
    search_title: &str,
    quality_score: f64,
) -> anyhow::Result<()> {
    let f = &collection.fields;
    let mut writer = collection.index.writer(15_000_000)?;

    let id = format!("author_openlibrary_{}", tags::normalize(search_title));
    let raw = RawDocument {
        id: id.clone(),
        mc_type: "author".to_string(),
        mc_subtype: None,
        source: "openlibrary".to_string(),
        source_id: tags::normalize(search_title),
        title: None,
        search_title: Some(search_title.to_string()),
        popularity: quality_score,
        rating: None,
        image: None,
        overview: None,
        fields: TypeFields::Author(crate::models::AuthorFields {
            quality_score: Some(quality_score),
            ..Default::default()
        }),
    };
    let payload = serde_json::to_string(&raw)?;

    let document = doc!(
        f.common.id => id,
        f.common.search_title => search_title,
        f.common.popularity_raw => quality_score,
        f.common.payload => payload,
        f.name => search_title,
        f.quality_score => quality_score,
    );
    writer.add_document(document)?;
    writer.commit()?;
    collection.reader.reload()?;
    Ok(())
}

fn seed_podcast(
    collection: &crate::index::store::Collection<crate::index::schema::PodcastFieldHandles>,
    search_title: &str,
    author: &str,
    popularity: f64,
) -> anyhow::Result<()> {
    let f = &collection.fields;
    let mut writer = collection.index.writer(15_000_000)?;

    let id = format!("podcast_podcastindex_{}", tags::normalize(search_title));
    let raw = RawDocument {
        id: id.clone(),
        mc_type: "podcast".to_string(),
        mc_subtype: None,
        source: "podcastindex".to_string(),
        source_id: tags::normalize(search_title),
        title: None,
        search_title: Some(search_title.to_string()),
        popularity,
        rating: None,
        image: None,
        overview: None,
        fields: TypeFields::Podcast(crate::models::PodcastFields {
            author: Some(author.to_string()),
            ..Default::default()
        }),
    };
    let payload = serde_json::to_string(&raw)?;

    let document = doc!(
        f.common.id => id,
        f.common.search_title => search_title,
        f.common.popularity_raw => popularity,
        f.common.payload => payload,
        f.author => author,
    );
    writer.add_document(document)?;
    writer.commit()?;
    collection.reader.reload()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_without_error_into_in_memory_indexes() {
        let set = IndexSet::open_in_memory().expect("in-memory index set opens");
        seed_demo_data(&set).expect("seeding succeeds");
    }
}
