//! SongLib Store - SQLite persistence for the song catalog
//!
//! - `db`: connection setup and scoped transactions
//! - `queries`: named SQL fragments
//! - `migrations`: the schema migration runner
//! - `repo`: song and verse repositories

pub mod db;
pub mod errors;
pub mod migrations;
pub mod queries;
pub mod repo;

pub use db::Database;
pub use migrations::{Direction, MigrationReport, Migrator, UpFailure};
pub use queries::QueryStore;
pub use repo::{SongRepository, VerseRepository};
