//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent between the migration runner,
//! the repositories and the HTTP layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Migration identifiers
pub const FIELD_VERSION: &str = "version";
pub const FIELD_FILE: &str = "file";
pub const FIELD_DIRECTION: &str = "direction";

// Catalog identifiers
pub const FIELD_SONG_ID: &str = "song_id";

// HTTP
pub const FIELD_METHOD: &str = "method";
pub const FIELD_PATH: &str = "path";
pub const FIELD_STATUS: &str = "status";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
