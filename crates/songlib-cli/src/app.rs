//! Application bootstrap shared by the commands

use std::path::Path;

use anyhow::Context;
use tracing::warn;

use songlib_core::config::MigrationConfig;
use songlib_core::logging_facility;
use songlib_core::{AppConfig, CancellationToken, RunContext};
use songlib_store::queries::migration_queries;
use songlib_store::{Migrator, UpFailure};

/// Load configuration and start logging
pub fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::from_env()?;
    logging_facility::init(config.log_profile);
    ensure_parent_dir(&config.database.path)?;
    Ok(config)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display())),
        _ => Ok(()),
    }
}

fn migration_context(config: &MigrationConfig, token: CancellationToken) -> RunContext {
    let ctx = RunContext::with_token(token);
    match config.timeout {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    }
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if signal.is_ok() {
                warn!("interrupt received, cancelling migration run");
                token.cancel();
            }
        }
        _ = token.cancelled() => {}
    }
}

/// Open a migrator and run `f` on a blocking thread
///
/// Ctrl-C cancels the run at the next database call. The migrator is closed
/// once `f` returns, whatever it returned.
pub async fn with_migrator<T, F>(config: &AppConfig, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut Migrator, &RunContext) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let token = CancellationToken::new();
    let ctx = migration_context(&config.migrations, token.clone());
    let watcher = tokio::spawn(cancel_on_ctrl_c(token));

    let database = config.database.clone();
    let dir = config.migrations.dir.clone();
    let result = tokio::task::spawn_blocking(move || -> anyhow::Result<T> {
        let mut migrator = Migrator::open(&database, dir, migration_queries(), &ctx)?;
        let outcome = f(&mut migrator, &ctx);
        if let Err(e) = migrator.close() {
            if outcome.is_ok() {
                return Err(e.into());
            }
            warn!(error = %e, "failed to close migration connection");
        }
        outcome
    })
    .await
    .context("migration task panicked");

    watcher.abort();
    result?
}

/// Render an Up failure, keeping the compensating Down's failure visible
pub fn up_failure(failure: UpFailure) -> anyhow::Error {
    match failure.rollback {
        Some(rollback) => anyhow::anyhow!(
            "migrate up failed: {}; compensating rollback also failed: {}",
            failure.up,
            rollback
        ),
        None => anyhow::Error::new(failure).context("migrations rolled back"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songlib_core::{ExError, ExErrorKind};

    #[test]
    fn test_up_failure_mentions_both_errors() {
        let failure = UpFailure {
            up: ExError::new(ExErrorKind::Execution).with_version("20240103"),
            rollback: Some(ExError::new(ExErrorKind::Execution).with_version("20240101")),
        };
        let text = up_failure(failure).to_string();
        assert!(text.contains("20240103"));
        assert!(text.contains("20240101"));
    }

    #[test]
    fn test_migration_context_applies_timeout() {
        let config = MigrationConfig {
            dir: "migrations".into(),
            timeout: Some(std::time::Duration::from_secs(5)),
        };
        let ctx = migration_context(&config, CancellationToken::new());
        assert!(ctx.deadline().is_some());
        assert!(ctx.check("test").is_ok());
    }
}
