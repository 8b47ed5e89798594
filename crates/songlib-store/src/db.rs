//! Database connection management

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};
use tracing::debug;

use songlib_core::{ExError, ExErrorKind};

use crate::errors::{connection_error, from_rusqlite, lock_poisoned, transaction_error, Result};

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    Connection::open(path).map_err(|e| connection_error(path, e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| connection_error(Path::new(":memory:"), e))
}

/// Configure a connection: foreign keys on, WAL journal
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    debug!(journal_mode = %mode, "connection configured");

    Ok(())
}

/// Round-trip a trivial query to prove the connection is usable
pub fn ping(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map(|_| ())
        .map_err(|e| {
            ExError::new(ExErrorKind::Connection)
                .with_op("ping")
                .with_message(e.to_string())
        })
}

/// Run `f` inside a transaction, committing only if it returns `Ok`
///
/// The transaction is scoped: an early return, an `Err` from `f`, or a panic
/// drops it uncommitted, which rolls it back.
pub fn with_transaction<T, F>(conn: &mut Connection, op: &str, f: F) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    let tx = conn
        .transaction()
        .map_err(|e| transaction_error(op, "begin", e))?;
    let value = f(&tx)?;
    tx.commit().map_err(|e| transaction_error(op, "commit", e))?;
    Ok(value)
}

/// A connection shared by the HTTP handlers
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open, configure and ping a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = open(path)?;
        configure(&conn)?;
        ping(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_configure_ping() {
        let conn = open_in_memory().unwrap();
        configure(&conn).unwrap();
        ping(&conn).unwrap();
    }

    #[test]
    fn test_open_missing_parent_dir_is_connection_error() {
        let err = open("/definitely/not/here/songs.db").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Connection);
    }

    #[test]
    fn test_with_transaction_rolls_back_on_error() {
        let mut conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();

        let result: Result<()> = with_transaction(&mut conn, "test", |tx| {
            tx.execute("INSERT INTO t (x) VALUES (1)", []).map_err(from_rusqlite)?;
            Err(ExError::new(ExErrorKind::Execution))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
