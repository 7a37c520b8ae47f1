//! HTTP surface for the EduForge catalog.
//!
//! # Responsibility
//! - Expose institution search and catalog hierarchy operations as JSON
//!   endpoints under `/api`.
//! - Render classified failures as HTML error pages.
//!
//! # Invariants
//! - Handlers never panic on user input; every failure goes through
//!   `catalog_core::classify`.
//! - Requests share no mutable state.

pub mod config;
pub mod error;
pub mod forms;
pub mod routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{router, AppState};

use catalog_core::db::{open_db, DbError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Startup or serving failure of [`serve`].
#[derive(Debug)]
pub enum ServeError {
    /// Database could not be opened or migrated at startup.
    Db(DbError),
    /// Listener bind or accept loop failure.
    Io(std::io::Error),
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "catalog database unavailable: {err}"),
            Self::Io(err) => write!(f, "http server failed: {err}"),
        }
    }
}

impl Error for ServeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for ServeError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for ServeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Migrates the configured database, then serves the router until the
/// process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    // Migrations run here, before the first request arrives.
    drop(open_db(&config.db_path)?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=api status=ok bind_addr={} db_path={}",
        listener.local_addr()?,
        config.db_path.display()
    );

    axum::serve(listener, router(AppState::new(config.db_path))).await?;
    Ok(())
}
