//! Migration file discovery

use std::path::{Path, PathBuf};

use songlib_core::{ExError, ExErrorKind};

use super::Direction;
use crate::errors::{directory_read, Result};

/// A migration script found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub version: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// The token before the first underscore
///
/// Returns `None` when the name has no underscore or starts with one.
pub fn version_from_file_name(file_name: &str) -> Option<&str> {
    match file_name.split_once('_') {
        Some((version, _)) if !version.is_empty() => Some(version),
        _ => None,
    }
}

/// List `dir` for scripts of the given direction, sorted by file name
///
/// An empty result is not an error. The directory is read fresh on every
/// call.
pub fn scan(dir: &Path, direction: Direction) -> Result<Vec<MigrationFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| directory_read(dir, e))?;
    let suffix = direction.file_suffix();

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| directory_read(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(suffix) {
            continue;
        }

        let version = version_from_file_name(file_name).ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("scan_migrations")
                .with_file(path.display().to_string())
                .with_message("migration file name has no version prefix")
        })?;

        files.push(MigrationFile {
            version: version.to_string(),
            file_name: file_name.to_string(),
            path: path.clone(),
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}
