// Integration tests for the migration runner

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::Connection;
use songlib_core::config::DatabaseConfig;
use songlib_core::{CancellationToken, ExErrorKind, RunContext};
use songlib_store::db;
use songlib_store::migrations::Direction;
use songlib_store::queries::{migration_queries, names};
use songlib_store::Migrator;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, sql: &str) {
    std::fs::write(dir.join(name), sql).expect("write migration file");
}

fn migrator(dir: &Path) -> Migrator {
    let conn = db::open_in_memory().expect("open in-memory db");
    Migrator::new(conn, dir, migration_queries())
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Three table-creating migrations with matching down scripts
fn three_migrations() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    // written out of order on purpose
    write(dir.path(), "20240103_c_up.sql", "CREATE TABLE c (id INTEGER);");
    write(dir.path(), "20240101_a_up.sql", "CREATE TABLE a (id INTEGER);");
    write(dir.path(), "20240102_b_up.sql", "CREATE TABLE b (id INTEGER);");
    write(dir.path(), "20240101_a_down.sql", "DROP TABLE IF EXISTS a;");
    write(dir.path(), "20240102_b_down.sql", "DROP TABLE IF EXISTS b;");
    write(dir.path(), "20240103_c_down.sql", "DROP TABLE IF EXISTS c;");
    dir
}

#[test]
fn test_up_applies_in_version_order() {
    // Given: migration files created out of order
    let dir = three_migrations();
    let mut m = migrator(dir.path());

    // When: Up runs
    let report = m.up(&RunContext::new()).unwrap();

    // Then: versions execute and are tracked in ascending order
    assert_eq!(report.direction, Direction::Up);
    assert_eq!(report.executed, vec!["20240101", "20240102", "20240103"]);
    assert!(report.skipped.is_empty());
    assert_eq!(
        m.applied_migrations(&RunContext::new()).unwrap(),
        vec!["20240101", "20240102", "20240103"]
    );
}

#[test]
fn test_up_is_idempotent() {
    let dir = three_migrations();
    let mut m = migrator(dir.path());
    let ctx = RunContext::new();

    m.up(&ctx).unwrap();
    let second = m.up(&ctx).unwrap();

    assert!(second.executed.is_empty(), "second run applied {:?}", second.executed);
    assert_eq!(second.skipped.len(), 3);
    assert_eq!(m.applied_migrations(&ctx).unwrap().len(), 3);
}

#[test]
fn test_up_skips_applied_and_runs_new() {
    // Given: 20240101 already applied
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20240101_a_up.sql", "CREATE TABLE a (id INTEGER);");
    let mut m = migrator(dir.path());
    let ctx = RunContext::new();
    m.up(&ctx).unwrap();

    // When: a new migration is added and Up runs again
    write(dir.path(), "20240104_d_up.sql", "CREATE TABLE d (id INTEGER);");
    let report = m.up(&ctx).unwrap();

    // Then: only the new version executes; re-running a would fail on CREATE TABLE
    assert_eq!(report.skipped, vec!["20240101"]);
    assert_eq!(report.executed, vec!["20240104"]);
}

#[test]
fn test_invalid_script_is_atomic() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "20240101_a_up.sql",
        "CREATE TABLE partial (id INTEGER);\nCREATE TABLEE nope (id INTEGER);",
    );
    let mut m = migrator(dir.path());

    let err = m.up(&RunContext::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Execution);
    assert_eq!(err.version(), Some("20240101"));
    assert!(err.file().unwrap().ends_with("20240101_a_up.sql"));
    assert!(!table_names(m.connection()).contains(&"partial".to_string()));
    assert!(m.applied_migrations(&RunContext::new()).unwrap().is_empty());
}

#[test]
fn test_failure_stops_the_run_but_keeps_prior_commits() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20240101_a_up.sql", "CREATE TABLE a (id INTEGER);");
    write(dir.path(), "20240102_b_up.sql", "THIS IS NOT SQL;");
    write(dir.path(), "20240103_c_up.sql", "CREATE TABLE c (id INTEGER);");
    let mut m = migrator(dir.path());

    assert!(m.up(&RunContext::new()).is_err());

    let tables = table_names(m.connection());
    assert!(tables.contains(&"a".to_string()));
    assert!(!tables.contains(&"c".to_string()));
    assert_eq!(
        m.applied_migrations(&RunContext::new()).unwrap(),
        vec!["20240101"]
    );
}

#[test]
fn test_empty_directory_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20240101_a_down.sql", "DROP TABLE IF EXISTS a;");
    let mut m = migrator(dir.path());

    let report = m.up(&RunContext::new()).unwrap();

    assert!(report.executed.is_empty());
    assert!(report.skipped.is_empty());
    // only the tracking table exists
    assert_eq!(table_names(m.connection()), vec!["schema_migrations"]);
}

#[test]
fn test_missing_directory_is_directory_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = migrator(&dir.path().join("does-not-exist"));

    let err = m.up(&RunContext::new()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DirectoryRead);
}

#[test]
fn test_unreadable_script_is_file_read_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("20240101_a_up.sql"), [0xff_u8, 0xfe, 0x00]).unwrap();
    let mut m = migrator(dir.path());

    let err = m.up(&RunContext::new()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::FileRead);
    assert_eq!(err.version(), Some("20240101"));
}

#[test]
fn test_missing_fragment_is_query_not_found() {
    let dir = three_migrations();
    let queries = migration_queries().without(names::INSERT_MIGRATION);
    let mut m = Migrator::new(db::open_in_memory().unwrap(), dir.path(), queries);

    let err = m.up(&RunContext::new()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::QueryNotFound);
    // the script's transaction was rolled back with it
    assert!(!table_names(m.connection()).contains(&"a".to_string()));
}

#[test]
fn test_down_replays_every_file_regardless_of_tracking() {
    // Given: only the first migration applied
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20240101_a_up.sql", "CREATE TABLE a (id INTEGER);");
    let mut m = migrator(dir.path());
    let ctx = RunContext::new();
    m.up(&ctx).unwrap();

    // And: down scripts for versions that were never applied
    write(dir.path(), "20240101_a_down.sql", "DROP TABLE IF EXISTS a;");
    write(dir.path(), "20240102_b_down.sql", "CREATE TABLE down_ran_b (id INTEGER);");
    write(dir.path(), "20240103_c_down.sql", "CREATE TABLE down_ran_c (id INTEGER);");

    // When: Down runs
    let report = m.down(&ctx).unwrap();

    // Then: every down file executed in ascending order
    assert_eq!(report.executed, vec!["20240101", "20240102", "20240103"]);
    let tables = table_names(m.connection());
    assert!(!tables.contains(&"a".to_string()));
    assert!(tables.contains(&"down_ran_b".to_string()));
    assert!(tables.contains(&"down_ran_c".to_string()));
    assert!(m.applied_migrations(&ctx).unwrap().is_empty());
}

#[test]
fn test_up_or_rollback_compensates_on_failure() {
    // Given: four migrations, the third of which is broken
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20240101_a_up.sql", "CREATE TABLE a (id INTEGER);");
    write(dir.path(), "20240102_b_up.sql", "CREATE TABLE b (id INTEGER);");
    write(dir.path(), "20240103_c_up.sql", "CREATE TABLEE c (id INTEGER);");
    write(dir.path(), "20240104_d_up.sql", "CREATE TABLE d (id INTEGER);");
    for v in ["20240101_a", "20240102_b", "20240103_c", "20240104_d"] {
        let table = &v[9..];
        write(
            dir.path(),
            &format!("{}_down.sql", v),
            &format!("DROP TABLE IF EXISTS {};", table),
        );
    }
    let mut m = migrator(dir.path());
    let ctx = RunContext::new();

    // When
    let failure = m.up_or_rollback(&ctx).unwrap_err();

    // Then: the Up error names the third file and the rollback succeeded
    assert_eq!(failure.up.kind(), ExErrorKind::Execution);
    assert!(failure.up.file().unwrap().ends_with("20240103_c_up.sql"));
    assert!(failure.rollback.is_none());

    let tables = table_names(m.connection());
    assert!(!tables.contains(&"a".to_string()));
    assert!(!tables.contains(&"b".to_string()));
    assert!(m.applied_migrations(&ctx).unwrap().is_empty());
}

#[test]
fn test_rollback_failure_is_reported_separately() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20240101_a_up.sql", "CREATE TABLE a (id INTEGER);");
    write(dir.path(), "20240102_b_up.sql", "NOT SQL AT ALL;");
    write(dir.path(), "20240101_a_down.sql", "ALSO NOT SQL;");
    let mut m = migrator(dir.path());

    let failure = m.up_or_rollback(&RunContext::new()).unwrap_err();

    // Up's error stays primary
    assert_eq!(failure.up.version(), Some("20240102"));
    assert!(failure.up.file().unwrap().ends_with("_up.sql"));

    let rollback = failure
        .rollback
        .as_ref()
        .expect("rollback failure should be reported");
    assert_eq!(rollback.kind(), ExErrorKind::Execution);
    assert!(rollback.file().unwrap().ends_with("20240101_a_down.sql"));
    assert!(failure.to_string().contains("20240102"));
}

#[test]
fn test_up_or_rollback_success_passes_report_through() {
    let dir = three_migrations();
    let mut m = migrator(dir.path());

    let report = m.up_or_rollback(&RunContext::new()).unwrap();
    assert_eq!(report.executed.len(), 3);
}

#[test]
fn test_cancelled_context_has_no_side_effects() {
    let dir = three_migrations();
    let mut m = migrator(dir.path());
    let token = CancellationToken::new();
    token.cancel();

    let err = m.up(&RunContext::with_token(token)).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Cancelled);
    assert!(table_names(m.connection()).is_empty());
}

#[test]
fn test_expired_deadline_times_out() {
    let dir = three_migrations();
    let mut m = migrator(dir.path());
    let past = Instant::now()
        .checked_sub(Duration::from_millis(5))
        .unwrap_or_else(Instant::now);

    let err = m.up(&RunContext::new().with_deadline(past)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Timeout);
}

#[test]
fn test_applied_versions_persist_across_reopen() {
    let migrations = three_migrations();
    let data = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: data.path().join("songs.db"),
    };
    let ctx = RunContext::new();

    let mut m = Migrator::open(&config, migrations.path(), migration_queries(), &ctx).unwrap();
    m.up(&ctx).unwrap();
    m.close().unwrap();

    let m = Migrator::open(&config, migrations.path(), migration_queries(), &ctx).unwrap();
    assert_eq!(m.applied_migrations(&ctx).unwrap().len(), 3);
    m.close().unwrap();
}

#[test]
fn test_project_migrations_round_trip() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let mut m = migrator(&dir);
    let ctx = RunContext::new();

    m.up(&ctx).unwrap();
    let tables = table_names(m.connection());
    assert!(tables.contains(&"songs".to_string()));
    assert!(tables.contains(&"verses".to_string()));

    m.down(&ctx).unwrap();
    let tables = table_names(m.connection());
    assert!(!tables.contains(&"songs".to_string()));
    assert!(!tables.contains(&"verses".to_string()));
}
