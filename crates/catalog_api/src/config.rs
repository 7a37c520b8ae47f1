//! HTTP server settings.
//!
//! Values are resolved by the binary (flags or environment); this module only
//! carries them and supplies defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_FILE_NAME: &str = "eduforge_catalog.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// SQLite file opened by every request.
    pub db_path: PathBuf,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr, db_path: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            db_path: db_path.into(),
        }
    }
}

/// Database file used when none is configured: `<tmp>/eduforge_catalog.sqlite3`.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

/// Resolves an optional, possibly blank, configured path.
pub fn resolve_db_path(configured: Option<&str>) -> PathBuf {
    match configured.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => PathBuf::from(trimmed),
        _ => default_db_path(),
    }
}
