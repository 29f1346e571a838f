//! Tantivy-backed index collections: schema definitions (C schema), the
//! blocking-search executor (C4), and the raw-document normalizer (C5).

pub mod executor;
pub mod normalizer;
pub mod schema;
pub mod seed;
pub mod store;

pub use store::{Collection, IndexSet};
