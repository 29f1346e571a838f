//! Query parsing, tag normalization, and per-source index query construction
//! (C1/C2/C3 in the component table).

pub mod builder;
pub mod parser;
pub mod tags;

pub use builder::{BuiltQuery, SortPolicy};
pub use parser::{FilterClause, ParsedQuery, MAX_QUERY_LEN};
pub use tags::normalize;
