//! HTTP handlers for institution search and the catalog hierarchy.
//!
//! Every handler that needs storage opens its own connection on the blocking
//! pool; handlers share nothing but the database path.

use crate::error::ApiError;
use crate::forms::{LevelForm, ProgramForm, SubjectForm};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use catalog_core::db::open_db;
use catalog_core::{
    is_searchable, search_institutions, sqlite_catalog, AcademicLevel, CatalogError,
    CatalogStructure, InstitutionId, InstitutionSummary, LevelId, Program, ProgramId,
    SqliteInstitutionRepository, Subject, SubjectId,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }
}

/// Builds the `/api` router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/institutions/search", get(search))
        .route(
            "/api/institutions/:institution_id/programs",
            get(list_programs).post(add_program),
        )
        .route(
            "/api/institutions/:institution_id/programs/count",
            get(count_programs),
        )
        .route("/api/institutions/:institution_id/subjects", get(list_all_subjects))
        .route("/api/institutions/:institution_id/structure", get(structure))
        .route("/api/programs/:program_id/levels", get(list_levels).post(add_level))
        .route("/api/levels/:level_id/subjects", get(list_subjects).post(add_subject))
        .route("/api/subjects/:subject_id", get(get_subject))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureParams {
    pub program_id: Option<ProgramId>,
    pub level_id: Option<LevelId>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<InstitutionSummary>>, ApiError> {
    let Query(params) = query?;
    let Some(query) = params.q.filter(|query| is_searchable(query)) else {
        return Ok(Json(Vec::new()));
    };

    let hits = with_connection(&state, move |conn| {
        let repo = SqliteInstitutionRepository::new(conn);
        Ok(search_institutions(&repo, Some(query.as_str()))?)
    })
    .await?;
    Ok(Json(hits))
}

async fn list_programs(
    State(state): State<AppState>,
    path: Result<Path<InstitutionId>, PathRejection>,
) -> Result<Json<Vec<Program>>, ApiError> {
    let Path(institution_id) = path?;
    let programs = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).programs(institution_id)?)
    })
    .await?;
    Ok(Json(programs))
}

async fn count_programs(
    State(state): State<AppState>,
    path: Result<Path<InstitutionId>, PathRejection>,
) -> Result<Json<CountResponse>, ApiError> {
    let Path(institution_id) = path?;
    let count = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).program_count(institution_id)?)
    })
    .await?;
    Ok(Json(CountResponse { count }))
}

async fn list_all_subjects(
    State(state): State<AppState>,
    path: Result<Path<InstitutionId>, PathRejection>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    let Path(institution_id) = path?;
    let subjects = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).all_subjects(institution_id)?)
    })
    .await?;
    Ok(Json(subjects))
}

async fn structure(
    State(state): State<AppState>,
    path: Result<Path<InstitutionId>, PathRejection>,
    query: Result<Query<StructureParams>, QueryRejection>,
) -> Result<Json<CatalogStructure>, ApiError> {
    let Path(institution_id) = path?;
    let Query(params) = query?;
    let structure = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).structure(institution_id, params.program_id, params.level_id)?)
    })
    .await?;
    Ok(Json(structure))
}

async fn add_program(
    State(state): State<AppState>,
    path: Result<Path<InstitutionId>, PathRejection>,
    form: Result<Json<ProgramForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Program>), ApiError> {
    let Path(institution_id) = path?;
    let Json(form) = form?;
    form.validate()?;

    let program = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).add_program(institution_id, &form.name)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(program)))
}

async fn list_levels(
    State(state): State<AppState>,
    path: Result<Path<ProgramId>, PathRejection>,
) -> Result<Json<Vec<AcademicLevel>>, ApiError> {
    let Path(program_id) = path?;
    let levels =
        with_connection(&state, move |conn| Ok(sqlite_catalog(conn).levels(program_id)?)).await?;
    Ok(Json(levels))
}

async fn add_level(
    State(state): State<AppState>,
    path: Result<Path<ProgramId>, PathRejection>,
    form: Result<Json<LevelForm>, JsonRejection>,
) -> Result<(StatusCode, Json<AcademicLevel>), ApiError> {
    let Path(program_id) = path?;
    let Json(form) = form?;
    form.validate()?;

    let level = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).add_level(program_id, &form.label)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(level)))
}

async fn list_subjects(
    State(state): State<AppState>,
    path: Result<Path<LevelId>, PathRejection>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    let Path(level_id) = path?;
    let subjects = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).subjects(level_id)?)
    })
    .await?;
    Ok(Json(subjects))
}

async fn add_subject(
    State(state): State<AppState>,
    path: Result<Path<LevelId>, PathRejection>,
    form: Result<Json<SubjectForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    let Path(level_id) = path?;
    let Json(form) = form?;
    form.validate()?;

    let subject = with_connection(&state, move |conn| {
        Ok(sqlite_catalog(conn).add_subject(level_id, &form.name)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

async fn get_subject(
    State(state): State<AppState>,
    path: Result<Path<SubjectId>, PathRejection>,
) -> Result<Json<Subject>, ApiError> {
    let Path(subject_id) = path?;
    let subject = with_connection(&state, move |conn| {
        sqlite_catalog(conn)
            .get_subject_by_id(subject_id)?
            .ok_or_else(|| CatalogError::NotFound(format!("subject not found: {subject_id}")))
    })
    .await?;
    Ok(Json(subject))
}

// Opens a fresh connection on the blocking pool and runs `work` against it.
async fn with_connection<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, CatalogError> + Send + 'static,
{
    let db_path = Arc::clone(&state.db_path);
    let outcome = tokio::task::spawn_blocking(move || -> Result<T, CatalogError> {
        let conn = open_db(db_path.as_path())?;
        work(&conn)
    })
    .await
    .map_err(|err| CatalogError::Internal(format!("catalog task failed: {err}")))?;

    Ok(outcome?)
}
