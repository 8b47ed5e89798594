//! Catalog repositories over the shared connection

mod song_repo;
mod verse_repo;

pub use song_repo::{split_verses, SongRepository};
pub use verse_repo::VerseRepository;
