use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{self, songs, verses};
use crate::middleware::request_logger;
use crate::state::AppState;

/// Build the route table
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics::render))
        .route("/api/songs", get(songs::list_songs))
        .route("/api/songs/create", post(songs::create_song))
        .route("/api/songs/update", put(songs::update_song))
        .route("/api/songs/delete", delete(songs::delete_song))
        .route("/api/songs/info", get(songs::song_info))
        .route("/api/verses", get(verses::list_verses))
        .layer(axum::middleware::from_fn(request_logger))
        .with_state(state)
}
