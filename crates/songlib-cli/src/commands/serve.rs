//! Serve command

use std::sync::Arc;

use tracing::{info, warn};

use songlib_api::{server, AppState, SongInfoClient};
use songlib_store::Database;

use crate::app;

pub async fn execute() -> anyhow::Result<()> {
    let config = app::load_config()?;

    let report = app::with_migrator(&config, |migrator, ctx| {
        migrator.up_or_rollback(ctx).map_err(app::up_failure)
    })
    .await?;
    info!(
        executed = report.executed.len(),
        skipped = report.skipped.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "migrations complete"
    );

    let db = Arc::new(Database::open(&config.database.path)?);
    let info_client = SongInfoClient::new(config.song_info_url.clone())?;
    let state = Arc::new(AppState::new(db, info_client));

    let listener = server::bind(&config.server.bind_addr()).await?;
    info!(address = %config.server.address(), "starting server");
    server::serve(listener, state, shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
