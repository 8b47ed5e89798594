use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use songlib_store::{Database, SongRepository, VerseRepository};

use crate::info_client::SongInfoClient;
use crate::telemetry;

/// Shared application state accessible from all request handlers.
pub struct AppState {
    pub songs: SongRepository,
    pub verses: VerseRepository,
    pub info: SongInfoClient,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(db: Arc<Database>, info: SongInfoClient) -> Self {
        Self {
            songs: SongRepository::new(db.clone()),
            verses: VerseRepository::new(db),
            info,
            metrics: telemetry::prometheus_handle(),
        }
    }
}
