//! Migration orchestration

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info, warn};

use songlib_core::config::DatabaseConfig;
use songlib_core::{log_op_end, log_op_error, log_op_start, ExError, RunContext};

use super::{apply_script, scan, Direction, VersionTracker};
use crate::db;
use crate::errors::{file_read, from_rusqlite, Result};
use crate::queries::QueryStore;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub direction: Direction,
    /// Versions executed, in execution order
    pub executed: Vec<String>,
    /// Versions skipped because they were already applied
    pub skipped: Vec<String>,
    pub elapsed: Duration,
}

/// An Up run failed; `rollback` is the compensating Down's own failure
#[derive(Debug, Error)]
#[error("migrate up failed: {up}")]
pub struct UpFailure {
    #[source]
    pub up: ExError,
    pub rollback: Option<ExError>,
}

/// Drives up and down runs over a directory of migration scripts
///
/// Owns its connection for its whole lifetime. Runs are synchronous and
/// sequential; every database call is preceded by a context check.
pub struct Migrator {
    conn: Connection,
    dir: PathBuf,
    queries: QueryStore,
}

impl Migrator {
    pub fn new(conn: Connection, dir: impl Into<PathBuf>, queries: QueryStore) -> Self {
        Self {
            conn,
            dir: dir.into(),
            queries,
        }
    }

    /// Open, configure and ping the database, then build a migrator over it
    pub fn open(
        config: &DatabaseConfig,
        dir: impl Into<PathBuf>,
        queries: QueryStore,
        ctx: &RunContext,
    ) -> Result<Self> {
        ctx.check("open_database")?;
        let conn = db::open(&config.path)?;
        db::configure(&conn)?;
        ctx.check("ping")?;
        db::ping(&conn)?;
        Ok(Self::new(conn, dir, queries))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Apply every migration not yet recorded, in filename order
    pub fn up(&mut self, ctx: &RunContext) -> Result<MigrationReport> {
        self.run(ctx, Direction::Up)
    }

    /// Replay every down script in filename order
    ///
    /// The tracking table is not consulted: a down script runs even when its
    /// version was never applied, so down scripts must guard themselves
    /// (`DROP TABLE IF EXISTS`).
    pub fn down(&mut self, ctx: &RunContext) -> Result<MigrationReport> {
        self.run(ctx, Direction::Down)
    }

    /// Applied versions in application order
    pub fn applied_migrations(&self, ctx: &RunContext) -> Result<Vec<String>> {
        let tracker = VersionTracker::new(&self.queries);
        tracker.ensure_table(&self.conn, ctx)?;
        tracker.applied(&self.conn, ctx)
    }

    /// Run Up; on failure run Down as a best-effort compensation
    ///
    /// The Up error stays primary. A failing compensation is logged and
    /// returned alongside it, never in its place.
    pub fn up_or_rollback(
        &mut self,
        ctx: &RunContext,
    ) -> std::result::Result<MigrationReport, UpFailure> {
        let up = match self.up(ctx) {
            Ok(report) => return Ok(report),
            Err(e) => e,
        };

        warn!(error = %up, "migrate up failed, running compensating down");
        let rollback = match self.down(ctx) {
            Ok(report) => {
                info!(
                    executed = report.executed.len(),
                    "compensating down completed"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "compensating down failed");
                Some(e)
            }
        };

        Err(UpFailure { up, rollback })
    }

    /// Close the connection
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| from_rusqlite(e).with_op("close_database"))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn run(&mut self, ctx: &RunContext, direction: Direction) -> Result<MigrationReport> {
        let op = direction.op();
        let start = Instant::now();
        log_op_start!(op, dir = %self.dir.display());

        match self.run_inner(ctx, direction, start) {
            Ok(report) => {
                log_op_end!(
                    op,
                    duration_ms = report.elapsed.as_millis() as u64,
                    executed = report.executed.len(),
                    skipped = report.skipped.len()
                );
                Ok(report)
            }
            Err(e) => {
                log_op_error!(
                    op,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    fn run_inner(
        &mut self,
        ctx: &RunContext,
        direction: Direction,
        start: Instant,
    ) -> Result<MigrationReport> {
        let tracker = VersionTracker::new(&self.queries);
        tracker.ensure_table(&self.conn, ctx)?;

        let files = scan(&self.dir, direction)?;
        let mut report = MigrationReport {
            direction,
            executed: Vec::new(),
            skipped: Vec::new(),
            elapsed: Duration::ZERO,
        };
        if files.is_empty() {
            debug!(dir = %self.dir.display(), direction = %direction, "no migration files");
            report.elapsed = start.elapsed();
            return Ok(report);
        }

        for migration in &files {
            if direction.skips_applied()
                && tracker.is_applied(&self.conn, ctx, &migration.version)?
            {
                debug!(
                    version = %migration.version,
                    file = %migration.file_name,
                    "migration already applied, skipping"
                );
                report.skipped.push(migration.version.clone());
                continue;
            }

            let script = std::fs::read_to_string(&migration.path).map_err(|e| {
                file_read(&migration.path, e).with_version(migration.version.as_str())
            })?;

            apply_script(&mut self.conn, &tracker, ctx, direction, migration, &script)?;
            info!(
                version = %migration.version,
                file = %migration.file_name,
                direction = %direction,
                "migration applied"
            );
            report.executed.push(migration.version.clone());
        }

        report.elapsed = start.elapsed();
        Ok(report)
    }
}
