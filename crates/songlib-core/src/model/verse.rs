use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSE_PAGE_SIZE: i64 = 10;
pub const MAX_VERSE_PAGE_SIZE: i64 = 50;

/// One verse of a song's lyrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub id: i64,
    pub song_id: i64,
    pub verse_number: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Verse paging window
///
/// Unlike the song listing, out-of-range values fall back to the defaults
/// instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersePage {
    pub page: i64,
    pub page_size: i64,
}

impl VersePage {
    pub fn lenient(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page_size = page_size
            .filter(|s| (1..=MAX_VERSE_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_VERSE_PAGE_SIZE);
        // a page past the addressable offsets falls back like any other bad value
        let page = page
            .filter(|p| *p >= 1 && (p - 1).checked_mul(page_size).is_some())
            .unwrap_or(1);
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for VersePage {
    fn default() -> Self {
        Self::lenient(None, None)
    }
}
