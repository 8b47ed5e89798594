//! SongLib API - HTTP surface of the song catalog
//!
//! - `router`: route table and shared middleware
//! - `handlers`: song, verse and health endpoints
//! - `info_client`: song-info enrichment client
//! - `server`: listener bootstrap with graceful shutdown
//! - `telemetry`: Prometheus request counter

pub mod error;
pub mod handlers;
pub mod info_client;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use info_client::SongInfoClient;
pub use router::build_router;
pub use server::serve;
pub use state::AppState;
