//! Query store
//!
//! Named SQL fragments are resolved at build time and handed to the
//! migration runner and the repositories as plain values:
//! - `QueryStore`: read-only name → SQL mapping
//! - Embedded fragment sets for migrations, songs and verses
//! - Fragment names

mod embedded;
pub mod names;
mod store;

pub use embedded::{migration_queries, song_queries, verse_queries};
pub use store::QueryStore;
