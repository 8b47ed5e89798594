//! Catalog domain model

pub mod page;
pub mod song;
pub mod verse;

pub use page::{Page, PageRequest};
pub use song::{NewSong, Song, SongDetail, SongFilter, SongUpdate};
pub use verse::{Verse, VersePage};
