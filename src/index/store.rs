//! Opens/creates the six per-collection tantivy indexes and exposes the
//! `IndexSet` handle carried on `AppState`.
//!
//! Grounded in the teacher's `services::database` startup pattern (open or
//! create on first run, single long-lived handle stored on shared state).

use std::path::Path;

use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexReader, ReloadPolicy};

use crate::index::schema::{
    build_author_schema, build_book_schema, build_media_schema, build_person_schema,
    build_podcast_schema, register_tokenizer, AuthorFieldHandles, BookFieldHandles,
    MediaFieldHandles, PersonFieldHandles, PodcastFieldHandles,
};

/// An opened collection: the tantivy `Index`, a `NearRealTime`-free reader
/// (`OnCommitWithDelay`, since this crate's query path never writes), and the
/// schema's typed field handles.
pub struct Collection<F> {
    pub index: Index,
    pub reader: IndexReader,
    pub fields: F,
}

impl<F> Collection<F> {
    fn open(dir: &Path, name: &str, schema: tantivy::schema::Schema, fields: F) -> anyhow::Result<Self> {
        let path = dir.join(name);
        std::fs::create_dir_all(&path)?;
        let directory = MmapDirectory::open(&path)?;
        let index = Index::open_or_create(directory, schema)?;
        register_tokenizer(&index);
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;
        Ok(Self { index, reader, fields })
    }
}

/// Every indexed collection named in §6 "Index schema".
pub struct IndexSet {
    pub tv: Collection<MediaFieldHandles>,
    pub movie: Collection<MediaFieldHandles>,
    pub person: Collection<PersonFieldHandles>,
    pub podcast: Collection<PodcastFieldHandles>,
    pub book: Collection<BookFieldHandles>,
    pub author: Collection<AuthorFieldHandles>,
}

impl IndexSet {
    /// Open every collection under `base_dir`, creating it on first run.
    pub fn open_or_create(base_dir: &Path) -> anyhow::Result<Self> {
        let (tv_schema, tv_fields) = build_media_schema();
        let (movie_schema, movie_fields) = build_media_schema();
        let (person_schema, person_fields) = build_person_schema();
        let (podcast_schema, podcast_fields) = build_podcast_schema();
        let (book_schema, book_fields) = build_book_schema();
        let (author_schema, author_fields) = build_author_schema();

        Ok(Self {
            tv: Collection::open(base_dir, "tv", tv_schema, tv_fields)?,
            movie: Collection::open(base_dir, "movie", movie_schema, movie_fields)?,
            person: Collection::open(base_dir, "person", person_schema, person_fields)?,
            podcast: Collection::open(base_dir, "podcast", podcast_schema, podcast_fields)?,
            book: Collection::open(base_dir, "book", book_schema, book_fields)?,
            author: Collection::open(base_dir, "author", author_schema, author_fields)?,
        })
    }

    /// Open every collection as a transient, never-persisted index. Used by
    /// tests and by `mediasearch-cli index seed --in-memory`.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let (tv_schema, tv_fields) = build_media_schema();
        let (movie_schema, movie_fields) = build_media_schema();
        let (person_schema, person_fields) = build_person_schema();
        let (podcast_schema, podcast_fields) = build_podcast_schema();
        let (book_schema, book_fields) = build_book_schema();
        let (author_schema, author_fields) = build_author_schema();

        let mk = |schema| {
            let index = Index::create_in_ram(schema);
            register_tokenizer(&index);
            let reader = index
                .reader_builder()
                .reload_policy(ReloadPolicy::OnCommitWithDelay)
                .try_into()
                .expect("in-memory reader always builds");
            (index, reader)
        };

        let (tv_index, tv_reader) = mk(tv_schema);
        let (movie_index, movie_reader) = mk(movie_schema);
        let (person_index, person_reader) = mk(person_schema);
        let (podcast_index, podcast_reader) = mk(podcast_schema);
        let (book_index, book_reader) = mk(book_schema);
        let (author_index, author_reader) = mk(author_schema);

        Ok(Self {
            tv: Collection { index: tv_index, reader: tv_reader, fields: tv_fields },
            movie: Collection { index: movie_index, reader: movie_reader, fields: movie_fields },
            person: Collection { index: person_index, reader: person_reader, fields: person_fields },
            podcast: Collection { index: podcast_index, reader: podcast_reader, fields: podcast_fields },
            book: Collection { index: book_index, reader: book_reader, fields: book_fields },
            author: Collection { index: author_index, reader: author_reader, fields: author_fields },
        })
    }
}
