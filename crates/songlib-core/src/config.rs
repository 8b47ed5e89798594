//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Parsing goes through a lookup function so tests never have to mutate
//! the real environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::logging_facility::Profile;

pub const ENV_DB_PATH: &str = "DB_PATH";
pub const ENV_SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_MIGRATIONS_DIR: &str = "MIGRATIONS_DIR";
pub const ENV_MIGRATION_TIMEOUT_SECS: &str = "MIGRATION_TIMEOUT_SECS";
pub const ENV_SONG_INFO_URL: &str = "SONG_INFO_URL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, suitable for binding a listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `protocol://host:port`, the externally visible base URL
    pub fn address(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Migration runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    pub dir: PathBuf,
    pub timeout: Option<Duration>,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub migrations: MigrationConfig,
    /// Base URL of the song-info endpoint used to enrich new songs
    pub song_info_url: String,
    pub log_profile: Profile,
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ExError::new(ExErrorKind::Configuration)
                    .with_op("load_dotenv")
                    .with_message(e.to_string()));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            path: PathBuf::from(required(&lookup, ENV_DB_PATH)?),
        };

        let port_raw = required(&lookup, ENV_SERVER_PORT)?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| invalid(ENV_SERVER_PORT, &port_raw, "expected a port number"))?;
        let server = ServerConfig {
            protocol: required(&lookup, ENV_SERVER_PROTOCOL)?,
            host: required(&lookup, ENV_SERVER_HOST)?,
            port,
        };

        let timeout = match optional(&lookup, ENV_MIGRATION_TIMEOUT_SECS) {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(invalid(
                        ENV_MIGRATION_TIMEOUT_SECS,
                        &raw,
                        "expected a positive number of seconds",
                    ))
                }
            },
        };
        let migrations = MigrationConfig {
            dir: PathBuf::from(
                optional(&lookup, ENV_MIGRATIONS_DIR)
                    .unwrap_or_else(|| DEFAULT_MIGRATIONS_DIR.to_string()),
            ),
            timeout,
        };

        let song_info_url = optional(&lookup, ENV_SONG_INFO_URL)
            .unwrap_or_else(|| server.address())
            .trim_end_matches('/')
            .to_string();

        let log_profile = match optional(&lookup, ENV_LOG_FORMAT) {
            None => Profile::Development,
            Some(raw) => Profile::from_log_format(&raw)
                .ok_or_else(|| invalid(ENV_LOG_FORMAT, &raw, "expected 'pretty' or 'json'"))?,
        };

        Ok(Self {
            database,
            server,
            migrations,
            song_info_url,
            log_profile,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| {
        ExError::new(ExErrorKind::Configuration)
            .with_op("load_config")
            .with_message(format!("missing required environment variable {}", key))
    })
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn invalid(key: &str, value: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_config")
        .with_message(format!("invalid {}={:?}: {}", key, value, reason))
}
