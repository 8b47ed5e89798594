//! Song persistence
//!
//! Verses are derived from the song text (blank-line separated stanzas) and
//! rewritten in the same transaction as every create and update.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, Transaction};
use tracing::debug;

use songlib_core::model::{NewSong, Page, Song, SongDetail, SongFilter, SongUpdate};
use songlib_core::CatalogError;

use crate::db::{with_transaction, Database};
use crate::errors::{from_rusqlite, Result};
use crate::queries::names::{
    SONG_COUNT, SONG_CREATE, SONG_DELETE, SONG_GET, SONG_LIST, SONG_UPDATE, VERSE_CREATE,
    VERSE_DELETE_FOR_SONG,
};
use crate::queries::{song_queries, verse_queries, QueryStore};

/// Songs table access
#[derive(Clone)]
pub struct SongRepository {
    db: Arc<Database>,
    songs: QueryStore,
    verses: QueryStore,
}

impl SongRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_queries(db, song_queries(), verse_queries())
    }

    pub fn with_queries(db: Arc<Database>, songs: QueryStore, verses: QueryStore) -> Self {
        Self { db, songs, verses }
    }

    pub fn get(&self, id: i64) -> Result<Song> {
        let sql = self.songs.get(SONG_GET)?;
        let conn = self.db.connection()?;
        let song = conn
            .query_row(sql, [id], song_from_row)
            .optional()
            .map_err(from_rusqlite)?;
        song.ok_or_else(|| CatalogError::SongNotFound { song_id: id }.into())
    }

    /// Filtered listing ordered by id
    pub fn list(&self, filter: &SongFilter) -> Result<Page<Song>> {
        let list_sql = self.songs.get(SONG_LIST)?;
        let count_sql = self.songs.get(SONG_COUNT)?;
        let year = filter.year.unwrap_or(0);

        let conn = self.db.connection()?;
        let total: i64 = conn
            .query_row(
                count_sql,
                params![filter.title, filter.artist, filter.album, year, filter.genre],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;

        let mut stmt = conn.prepare(list_sql).map_err(from_rusqlite)?;
        let songs = stmt
            .query_map(
                params![
                    filter.title,
                    filter.artist,
                    filter.album,
                    year,
                    filter.genre,
                    filter.page.per_page,
                    filter.page.offset(),
                ],
                song_from_row,
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(Page::new(songs, total, filter.page))
    }

    /// Store a new song with its enrichment, returning the new id
    pub fn create(&self, new_song: &NewSong, detail: &SongDetail) -> Result<i64> {
        new_song.validate()?;
        let sql = self.songs.get(SONG_CREATE)?;
        let now = Utc::now();

        let mut conn = self.db.connection()?;
        let id = with_transaction(&mut conn, "create_song", |tx| {
            tx.execute(
                sql,
                params![
                    new_song.song.trim(),
                    new_song.group.trim(),
                    "",
                    "",
                    0_i64,
                    detail.release_date,
                    detail.text,
                    detail.link,
                    now,
                ],
            )
            .map_err(from_rusqlite)?;
            let id = tx.last_insert_rowid();
            self.replace_verses(tx, id, detail.text.as_deref())?;
            Ok(id)
        })?;

        debug!(song_id = id, "song created");
        Ok(id)
    }

    /// Replace a song's editable fields
    pub fn update(&self, id: i64, update: &SongUpdate) -> Result<Song> {
        update.validate()?;
        let sql = self.songs.get(SONG_UPDATE)?;
        let now = Utc::now();

        {
            let mut conn = self.db.connection()?;
            with_transaction(&mut conn, "update_song", |tx| {
                let changed = tx
                    .execute(
                        sql,
                        params![
                            update.title.trim(),
                            update.artist.trim(),
                            update.album,
                            update.genre,
                            update.duration,
                            update.release_date,
                            update.text,
                            update.link,
                            now,
                            id,
                        ],
                    )
                    .map_err(from_rusqlite)?;
                if changed == 0 {
                    return Err(CatalogError::SongNotFound { song_id: id }.into());
                }
                self.replace_verses(tx, id, update.text.as_deref())
            })?;
        }

        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let sql = self.songs.get(SONG_DELETE)?;
        let delete_verses = self.verses.get(VERSE_DELETE_FOR_SONG)?;

        let mut conn = self.db.connection()?;
        with_transaction(&mut conn, "delete_song", |tx| {
            tx.execute(delete_verses, [id]).map_err(from_rusqlite)?;
            let changed = tx.execute(sql, [id]).map_err(from_rusqlite)?;
            if changed == 0 {
                return Err(CatalogError::SongNotFound { song_id: id }.into());
            }
            Ok(())
        })
    }

    fn replace_verses(&self, tx: &Transaction<'_>, song_id: i64, text: Option<&str>) -> Result<()> {
        let delete_sql = self.verses.get(VERSE_DELETE_FOR_SONG)?;
        let create_sql = self.verses.get(VERSE_CREATE)?;
        tx.execute(delete_sql, [song_id]).map_err(from_rusqlite)?;

        let now = Utc::now();
        for (i, content) in split_verses(text.unwrap_or_default()).iter().enumerate() {
            tx.execute(create_sql, params![song_id, i as i64 + 1, content, now])
                .map_err(from_rusqlite)?;
        }
        Ok(())
    }
}

/// Split lyrics into stanzas on blank lines
pub fn split_verses(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let mut verses = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                verses.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        verses.push(current.join("\n"));
    }
    verses
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        album: row.get(3)?,
        genre: row.get(4)?,
        duration: row.get(5)?,
        release_date: row.get(6)?,
        text: row.get(7)?,
        link: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_verses_on_blank_lines() {
        let text = "line one\nline two\n\n\nchorus\r\n\r\nlast  ";
        assert_eq!(
            split_verses(text),
            vec!["line one\nline two", "chorus", "last"]
        );
    }

    #[test]
    fn test_split_verses_empty() {
        assert!(split_verses("").is_empty());
        assert!(split_verses("\n \n").is_empty());
    }
}
