use std::sync::Arc;

use rusqlite::Row;

use songlib_core::model::{Verse, VersePage};

use crate::db::Database;
use crate::errors::{from_rusqlite, Result};
use crate::queries::names::VERSE_GET;
use crate::queries::{verse_queries, QueryStore};

/// Verses table access
#[derive(Clone)]
pub struct VerseRepository {
    db: Arc<Database>,
    queries: QueryStore,
}

impl VerseRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_queries(db, verse_queries())
    }

    pub fn with_queries(db: Arc<Database>, queries: QueryStore) -> Self {
        Self { db, queries }
    }

    /// One page of a song's verses, ordered by verse number
    ///
    /// An unknown song yields an empty page.
    pub fn for_song(&self, song_id: i64, page: VersePage) -> Result<Vec<Verse>> {
        let sql = self.queries.get(VERSE_GET)?;
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let verses = stmt
            .query_map([song_id, page.page_size, page.offset()], verse_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(verses)
    }
}

fn verse_from_row(row: &Row<'_>) -> rusqlite::Result<Verse> {
    Ok(Verse {
        id: row.get(0)?,
        song_id: row.get(1)?,
        verse_number: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}
