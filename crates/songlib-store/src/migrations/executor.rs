//! One migration, one transaction

use rusqlite::Connection;

use songlib_core::{ExError, ExErrorKind, RunContext};

use super::{Direction, MigrationFile, VersionTracker};
use crate::db::with_transaction;
use crate::errors::Result;

/// Run `script` and its tracking mutation atomically
///
/// Either both the script's effects and the tracking row change commit, or
/// nothing does.
pub fn apply_script(
    conn: &mut Connection,
    tracker: &VersionTracker<'_>,
    ctx: &RunContext,
    direction: Direction,
    migration: &MigrationFile,
    script: &str,
) -> Result<()> {
    ctx.check("begin_transaction")?;
    with_transaction(conn, direction.op(), |tx| {
        ctx.check("execute_script")?;
        tx.execute_batch(script).map_err(|e| {
            ExError::new(ExErrorKind::Execution)
                .with_op(direction.op())
                .with_version(migration.version.as_str())
                .with_file(migration.path.display().to_string())
                .with_message(e.to_string())
        })?;

        ctx.check("record_version")?;
        tracker
            .record(tx, direction, &migration.version)
            .map_err(|e| e.with_file(migration.path.display().to_string()))?;

        ctx.check("commit_transaction")
    })
}
