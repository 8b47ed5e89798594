use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use songlib_core::{ExError, ExErrorKind, Result};

use crate::router::build_router;
use crate::state::AppState;

/// Bind a listener on `addr` (`host:port`)
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("bind")
            .with_message(format!("{}: {}", addr, e))
    })
}

/// Serve the API until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("songlib listening on {}", addr);
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("serve")
                .with_message(format!("server error: {}", e))
        })
}
