//! Embedded SQL fragments
//!
//! Fragments are embedded at compile time using include_str!

use super::names::*;
use super::QueryStore;

/// Fragments driving the migration runner's tracking table
pub fn migration_queries() -> QueryStore {
    QueryStore::from_entries([
        (
            CREATE_MIGRATIONS_TABLE,
            include_str!("../../queries/migrations/create_migrations_table.sql"),
        ),
        (
            CHECK_MIGRATION_EXISTS,
            include_str!("../../queries/migrations/check_migration_exists.sql"),
        ),
        (
            GET_APPLIED_MIGRATIONS,
            include_str!("../../queries/migrations/get_applied_migrations.sql"),
        ),
        (
            INSERT_MIGRATION,
            include_str!("../../queries/migrations/insert_migration.sql"),
        ),
        (
            DELETE_MIGRATION,
            include_str!("../../queries/migrations/delete_migration.sql"),
        ),
    ])
}

/// Fragments used by the song repository
pub fn song_queries() -> QueryStore {
    QueryStore::from_entries([
        (SONG_GET, include_str!("../../queries/songs/get.sql")),
        (SONG_LIST, include_str!("../../queries/songs/list.sql")),
        (SONG_COUNT, include_str!("../../queries/songs/count.sql")),
        (SONG_CREATE, include_str!("../../queries/songs/create.sql")),
        (SONG_UPDATE, include_str!("../../queries/songs/update.sql")),
        (SONG_DELETE, include_str!("../../queries/songs/delete.sql")),
    ])
}

/// Fragments used by the verse repository
pub fn verse_queries() -> QueryStore {
    QueryStore::from_entries([
        (VERSE_GET, include_str!("../../queries/verses/get.sql")),
        (VERSE_CREATE, include_str!("../../queries/verses/create.sql")),
        (
            VERSE_DELETE_FOR_SONG,
            include_str!("../../queries/verses/delete_for_song.sql"),
        ),
    ])
}
