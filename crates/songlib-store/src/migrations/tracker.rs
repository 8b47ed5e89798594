//! Applied-version bookkeeping

use rusqlite::{Connection, Transaction};

use songlib_core::RunContext;

use super::Direction;
use crate::errors::{execution_error, from_rusqlite, Result};
use crate::queries::names::{
    CHECK_MIGRATION_EXISTS, CREATE_MIGRATIONS_TABLE, GET_APPLIED_MIGRATIONS,
};
use crate::queries::QueryStore;

/// Reads and writes the tracking table through named fragments
///
/// Mutations take a `Transaction`, so they can only run inside the
/// executor's transaction.
#[derive(Debug, Clone, Copy)]
pub struct VersionTracker<'q> {
    queries: &'q QueryStore,
}

impl<'q> VersionTracker<'q> {
    pub fn new(queries: &'q QueryStore) -> Self {
        Self { queries }
    }

    /// Create the tracking table if absent
    pub fn ensure_table(&self, conn: &Connection, ctx: &RunContext) -> Result<()> {
        let sql = self.queries.get(CREATE_MIGRATIONS_TABLE)?;
        ctx.check("ensure_table")?;
        conn.execute_batch(sql)
            .map_err(|e| from_rusqlite(e).with_op("ensure_table"))
    }

    pub fn is_applied(&self, conn: &Connection, ctx: &RunContext, version: &str) -> Result<bool> {
        let sql = self.queries.get(CHECK_MIGRATION_EXISTS)?;
        ctx.check("is_applied")?;
        conn.query_row(sql, [version], |row| row.get::<_, bool>(0))
            .map_err(|e| from_rusqlite(e).with_op("is_applied").with_version(version))
    }

    /// Versions in the order they were applied
    pub fn applied(&self, conn: &Connection, ctx: &RunContext) -> Result<Vec<String>> {
        let sql = self.queries.get(GET_APPLIED_MIGRATIONS)?;
        ctx.check("get_applied_migrations")?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| from_rusqlite(e).with_op("get_applied_migrations"))?;
        let versions = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(versions)
    }

    pub fn insert(&self, tx: &Transaction<'_>, version: &str) -> Result<()> {
        self.record(tx, Direction::Up, version)
    }

    pub fn delete(&self, tx: &Transaction<'_>, version: &str) -> Result<()> {
        self.record(tx, Direction::Down, version)
    }

    /// Apply the direction's tracking mutation
    pub fn record(&self, tx: &Transaction<'_>, direction: Direction, version: &str) -> Result<()> {
        let sql = self.queries.get(direction.tracking_query())?;
        tx.execute(sql, [version])
            .map(|_| ())
            .map_err(|e| {
                execution_error(
                    direction.op(),
                    version,
                    &format!("{} failed: {}", direction.tracking_query(), e),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_in_memory, with_transaction};
    use crate::queries::migration_queries;
    use songlib_core::ExErrorKind;

    #[test]
    fn test_insert_then_delete() {
        let queries = migration_queries();
        let tracker = VersionTracker::new(&queries);
        let ctx = RunContext::new();
        let mut conn = open_in_memory().unwrap();

        tracker.ensure_table(&conn, &ctx).unwrap();
        tracker.ensure_table(&conn, &ctx).unwrap();
        assert!(!tracker.is_applied(&conn, &ctx, "20240101").unwrap());

        with_transaction(&mut conn, "test", |tx| tracker.insert(tx, "20240101")).unwrap();
        assert!(tracker.is_applied(&conn, &ctx, "20240101").unwrap());
        assert_eq!(tracker.applied(&conn, &ctx).unwrap(), vec!["20240101"]);

        with_transaction(&mut conn, "test", |tx| tracker.delete(tx, "20240101")).unwrap();
        assert!(tracker.applied(&conn, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_insert_is_execution_error() {
        let queries = migration_queries();
        let tracker = VersionTracker::new(&queries);
        let mut conn = open_in_memory().unwrap();
        tracker.ensure_table(&conn, &RunContext::new()).unwrap();

        with_transaction(&mut conn, "test", |tx| tracker.insert(tx, "1")).unwrap();
        let err = with_transaction(&mut conn, "test", |tx| tracker.insert(tx, "1")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Execution);
        assert_eq!(err.version(), Some("1"));
    }

    #[test]
    fn test_missing_fragment_is_query_not_found() {
        let queries = migration_queries().without(CHECK_MIGRATION_EXISTS);
        let tracker = VersionTracker::new(&queries);
        let conn = open_in_memory().unwrap();
        let ctx = RunContext::new();
        tracker.ensure_table(&conn, &ctx).unwrap();

        let err = tracker.is_applied(&conn, &ctx, "1").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::QueryNotFound);
    }
}
