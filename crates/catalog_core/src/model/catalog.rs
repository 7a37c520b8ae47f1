//! Catalog hierarchy records: Program → AcademicLevel → Subject.
//!
//! # Invariants
//! - Names and labels are stored trimmed; trimming happens in
//!   `CatalogService` before persistence.
//! - Records are created once and never updated or deleted.

use crate::model::institution::InstitutionId;
use serde::{Deserialize, Serialize};

pub type ProgramId = i64;
pub type LevelId = i64;
pub type SubjectId = i64;

/// Named curriculum track owned by an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub institution_id: InstitutionId,
    pub name: String,
}

/// Ordered tier within a program (e.g. `L1`, `Terminale`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicLevel {
    pub id: LevelId,
    pub program_id: ProgramId,
    pub label: String,
}

/// Taught topic within an academic level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub level_id: LevelId,
    pub name: String,
}

/// Structure page model: programs plus the drill-down selected by the caller.
///
/// `levels` is populated only when a program is selected and `subjects` only
/// when a level is selected; the two selections are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStructure {
    pub institution_id: InstitutionId,
    pub programs: Vec<Program>,
    pub selected_program_id: Option<ProgramId>,
    pub levels: Option<Vec<AcademicLevel>>,
    pub selected_level_id: Option<LevelId>,
    pub subjects: Option<Vec<Subject>>,
}
