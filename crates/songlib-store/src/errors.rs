//! Error helpers for songlib-store
//!
//! Builds `ExError` values with the context each store failure needs.

use std::path::Path;

use songlib_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Database could not be opened or pinged
pub fn connection_error(path: &Path, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Connection)
        .with_op("open_database")
        .with_file(path.display().to_string())
        .with_message(err.to_string())
}

/// Migrations or query directory could not be listed
pub fn directory_read(dir: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::DirectoryRead)
        .with_op("read_dir")
        .with_file(dir.display().to_string())
        .with_message(err.to_string())
}

/// A SQL file could not be read
pub fn file_read(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::FileRead)
        .with_op("read_file")
        .with_file(path.display().to_string())
        .with_message(err.to_string())
}

/// A named SQL fragment is not in the query store
pub fn query_not_found(name: &str) -> ExError {
    ExError::new(ExErrorKind::QueryNotFound)
        .with_op("get_query")
        .with_message(format!("query '{}' not found", name))
}

/// A migration script or tracking mutation failed
pub fn execution_error(op: &str, version: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Execution)
        .with_op(op.to_string())
        .with_version(version.to_string())
        .with_message(reason.to_string())
}

/// Transaction begin or commit failed
pub fn transaction_error(op: &str, stage: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Transaction)
        .with_op(op.to_string())
        .with_message(format!("{} failed: {}", stage, err))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Shared connection mutex was poisoned by a panicking holder
pub fn lock_poisoned() -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("lock_connection")
        .with_message("database connection lock poisoned")
}
