//! SongLib Core - shared facilities for the song catalog
//!
//! - Canonical error facility (`ExError`, `ExErrorKind`) and catalog errors
//! - Structured logging facility built on `tracing`
//! - Cancellation/deadline context for blocking database work
//! - Environment configuration
//! - Catalog domain model (songs, verses, pagination)

pub mod config;
pub mod context;
pub mod errors;
pub mod logging_facility;
pub mod model;

pub use config::AppConfig;
pub use context::{CancellationToken, RunContext};
pub use errors::{CatalogError, ExError, ExErrorKind, Result};
pub use model::{NewSong, Page, PageRequest, Song, SongDetail, SongFilter, SongUpdate, Verse};
