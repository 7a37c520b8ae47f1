//! Core domain logic for the EduForge academic catalog.
//! Owns the Program → AcademicLevel → Subject hierarchy, institution search
//! and failure classification; outer layers only adapt transport.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use error::{classify, CatalogError, ErrorPage, ErrorView};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::catalog::{
    AcademicLevel, CatalogStructure, LevelId, Program, ProgramId, Subject, SubjectId,
};
pub use model::institution::{Institution, InstitutionId, InstitutionType, NewInstitution};
pub use repo::catalog_repo::{
    LevelRepository, ProgramRepository, SqliteLevelRepository, SqliteProgramRepository,
    SqliteSubjectRepository, SubjectRepository,
};
pub use repo::institution_repo::{InstitutionRepository, SqliteInstitutionRepository};
pub use db::DbError;
pub use repo::{RepoError, RepoResult};
pub use search::institution_search::{is_searchable, search_institutions, InstitutionSummary};
pub use service::catalog_service::CatalogService;

/// Catalog service wired to SQLite repositories sharing one connection.
pub type SqliteCatalogService<'conn> = CatalogService<
    SqliteProgramRepository<'conn>,
    SqliteLevelRepository<'conn>,
    SqliteSubjectRepository<'conn>,
>;

/// Builds a [`SqliteCatalogService`] over a migrated connection.
pub fn sqlite_catalog(conn: &rusqlite::Connection) -> SqliteCatalogService<'_> {
    CatalogService::new(
        SqliteProgramRepository::new(conn),
        SqliteLevelRepository::new(conn),
        SqliteSubjectRepository::new(conn),
    )
}

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
