//! Fixed fragment names

pub const CREATE_MIGRATIONS_TABLE: &str = "create_migrations_table";
pub const CHECK_MIGRATION_EXISTS: &str = "check_migration_exists";
pub const GET_APPLIED_MIGRATIONS: &str = "get_applied_migrations";
pub const INSERT_MIGRATION: &str = "insert_migration";
pub const DELETE_MIGRATION: &str = "delete_migration";

pub const SONG_GET: &str = "get";
pub const SONG_LIST: &str = "list";
pub const SONG_COUNT: &str = "count";
pub const SONG_CREATE: &str = "create";
pub const SONG_UPDATE: &str = "update";
pub const SONG_DELETE: &str = "delete";

pub const VERSE_GET: &str = "get";
pub const VERSE_CREATE: &str = "create";
pub const VERSE_DELETE_FOR_SONG: &str = "delete_for_song";
