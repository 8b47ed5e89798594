//! Core types shared across SongLib facilities
//!
//! - **Correlation types**: RequestId for tagging HTTP request logs
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
