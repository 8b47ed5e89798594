use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure in SongLib is classified into one of these kinds. Each kind
/// maps to a stable error code used by tests, log lines and HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Startup
    /// Missing or invalid configuration value
    Configuration,
    /// Database could not be opened or did not answer a ping
    Connection,

    // Migration runner
    /// Migrations directory could not be listed
    DirectoryRead,
    /// A migration or query file could not be read
    FileRead,
    /// A named SQL fragment is absent from the query store
    QueryNotFound,
    /// A migration script or tracking mutation failed
    Execution,
    /// Transaction begin/commit failed
    Transaction,
    /// The run context was cancelled before the next database call
    Cancelled,
    /// The run context deadline passed before the next database call
    Timeout,

    // Catalog
    InvalidInput,
    NotFound,

    // Integration/IO
    Persistence,
    Serialization,
    ExternalService,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::DirectoryRead => "ERR_DIRECTORY_READ",
            ExErrorKind::FileRead => "ERR_FILE_READ",
            ExErrorKind::QueryNotFound => "ERR_QUERY_NOT_FOUND",
            ExErrorKind::Execution => "ERR_EXECUTION",
            ExErrorKind::Transaction => "ERR_TRANSACTION",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus the context needed to diagnose a
/// failure without re-running: the operation, the migration version and file,
/// or the catalog entity involved.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    version: Option<String>,
    file: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            version: None,
            file: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (song or verse id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add file path context
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the migration version context, if any
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the file context, if any
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = &self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(file) = &self.file {
            write!(f, " (file: {})", file)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Catalog-level failures raised by the repositories and request validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Song id did not match any row
    #[error("Song not found: {song_id}")]
    SongNotFound { song_id: i64 },

    /// Page number below 1
    #[error("Invalid page: {page}")]
    InvalidPage { page: i64 },

    /// Page size outside the allowed range
    #[error("Invalid per_page: {per_page} (allowed 1..={max})")]
    InvalidPerPage { per_page: i64, max: i64 },

    /// Title or artist left empty
    #[error("Missing required fields: {fields}")]
    MissingRequiredFields { fields: String },

    /// An id parameter that does not parse as an integer
    #[error("Invalid id: {raw:?}")]
    InvalidId { raw: String },
}

impl From<CatalogError> for ExError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::SongNotFound { song_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(song_id.to_string())
                .with_message(message),
            CatalogError::InvalidPage { .. }
            | CatalogError::InvalidPerPage { .. }
            | CatalogError::MissingRequiredFields { .. }
            | CatalogError::InvalidId { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_error_kind_codes() {
        let cases = [
            (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
            (ExErrorKind::Connection, "ERR_CONNECTION"),
            (ExErrorKind::DirectoryRead, "ERR_DIRECTORY_READ"),
            (ExErrorKind::FileRead, "ERR_FILE_READ"),
            (ExErrorKind::QueryNotFound, "ERR_QUERY_NOT_FOUND"),
            (ExErrorKind::Execution, "ERR_EXECUTION"),
            (ExErrorKind::Transaction, "ERR_TRANSACTION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_version_and_file() {
        let err = ExError::new(ExErrorKind::Execution)
            .with_op("migrate_up")
            .with_version("20240101")
            .with_file("migrations/20240101_init_up.sql")
            .with_message("near \"CREAT\": syntax error");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_EXECUTION] in operation 'migrate_up'"));
        assert!(text.contains("(version: 20240101)"));
        assert!(text.contains("(file: migrations/20240101_init_up.sql)"));
    }

    #[test]
    fn test_source_chain_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk gone");
        let outer = ExError::new(ExErrorKind::FileRead).with_source(inner);
        let source = std::error::Error::source(&outer).expect("source should be set");
        assert!(source.to_string().contains("disk gone"));
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
    }
}
