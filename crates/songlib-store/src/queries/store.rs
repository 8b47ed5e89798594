use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::{directory_read, file_read, query_not_found, Result};

const SQL_EXTENSION: &str = "sql";

/// Read-only mapping from fragment name to SQL text
///
/// Text is stored trimmed with trailing semicolons removed so each fragment
/// prepares as exactly one statement.
#[derive(Debug, Clone, Default)]
pub struct QueryStore {
    queries: BTreeMap<String, String>,
}

impl QueryStore {
    /// Build from `(name, sql)` pairs
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let queries = entries
            .into_iter()
            .map(|(name, sql)| (name.into(), normalize(sql.as_ref())))
            .collect();
        Self { queries }
    }

    /// Load every `*.sql` file in `dir`, keyed by file stem
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| directory_read(dir, e))?;

        let mut queries = BTreeMap::new();
        for entry in entries {
            let path = entry.map_err(|e| directory_read(dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SQL_EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let sql = std::fs::read_to_string(&path).map_err(|e| file_read(&path, e))?;
            queries.insert(name.to_string(), normalize(&sql));
        }

        Ok(Self { queries })
    }

    /// Look up a fragment by name
    pub fn get(&self, name: &str) -> Result<&str> {
        self.queries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| query_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queries.contains_key(name)
    }

    /// Fragment names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }

    /// A copy of this store without `name`
    pub fn without(&self, name: &str) -> Self {
        let mut queries = self.queries.clone();
        queries.remove(name);
        Self { queries }
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

fn normalize(sql: &str) -> String {
    sql.trim().trim_end_matches(';').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use songlib_core::ExErrorKind;

    #[test]
    fn test_missing_fragment_is_query_not_found() {
        let store = QueryStore::from_entries([("a", "SELECT 1;")]);
        let err = store.get("b").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::QueryNotFound);
        assert!(err.message().contains("'b'"));
    }

    #[test]
    fn test_normalize_strips_terminators() {
        let store = QueryStore::from_entries([("a", "\n  SELECT 1;;\n\n")]);
        assert_eq!(store.get("a").unwrap(), "SELECT 1");
    }

    #[test]
    fn test_from_dir_loads_sql_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("get.sql"), "SELECT 1;").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let store = QueryStore::from_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("get").unwrap(), "SELECT 1");
        assert!(!store.contains("notes"));
    }

    #[test]
    fn test_from_missing_dir_is_directory_read() {
        let dir = tempfile::tempdir().unwrap();
        let err = QueryStore::from_dir(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DirectoryRead);
    }

    #[test]
    fn test_without_removes_only_named_fragment() {
        let store = QueryStore::from_entries([("a", "SELECT 1"), ("b", "SELECT 2")]);
        let trimmed = store.without("a");
        assert!(!trimmed.contains("a"));
        assert!(trimmed.contains("b"));
        assert!(store.contains("a"));
    }
}
