//! Catalog hierarchy use-case service.
//!
//! # Responsibility
//! - Read the Program → AcademicLevel → Subject hierarchy in its declared
//!   orders.
//! - Create hierarchy entries with trimmed names/labels.
//! - Flatten an institution's subjects through the full hierarchy.
//!
//! # Invariants
//! - Absence is an empty list or `None`, never an error.
//! - Storage failures propagate unchanged.
//! - No parent-existence or non-empty checks happen here; callers that need
//!   them validate before calling.

use crate::model::catalog::{
    AcademicLevel, CatalogStructure, LevelId, Program, ProgramId, Subject, SubjectId,
};
use crate::model::institution::InstitutionId;
use crate::repo::catalog_repo::{LevelRepository, ProgramRepository, SubjectRepository};
use crate::repo::RepoResult;
use log::info;

/// Catalog service over injected program, level and subject repositories.
pub struct CatalogService<P, L, S>
where
    P: ProgramRepository,
    L: LevelRepository,
    S: SubjectRepository,
{
    programs: P,
    levels: L,
    subjects: S,
}

impl<P, L, S> CatalogService<P, L, S>
where
    P: ProgramRepository,
    L: LevelRepository,
    S: SubjectRepository,
{
    pub fn new(programs: P, levels: L, subjects: S) -> Self {
        Self {
            programs,
            levels,
            subjects,
        }
    }

    /// Programs of an institution, name ascending.
    pub fn programs(&self, institution_id: InstitutionId) -> RepoResult<Vec<Program>> {
        self.programs.list_by_institution(institution_id)
    }

    /// Levels of a program, label ascending.
    pub fn levels(&self, program_id: ProgramId) -> RepoResult<Vec<AcademicLevel>> {
        self.levels.list_by_program(program_id)
    }

    /// Subjects of a level, name ascending.
    pub fn subjects(&self, level_id: LevelId) -> RepoResult<Vec<Subject>> {
        self.subjects.list_by_level(level_id)
    }

    /// Every subject of an institution, grouped by program then level.
    ///
    /// The result is ordered program-name, then level-label, then
    /// subject-name; it is not a global sort by subject name. Issues one
    /// query for programs, one per program and one per level.
    pub fn all_subjects(&self, institution_id: InstitutionId) -> RepoResult<Vec<Subject>> {
        let mut all = Vec::new();
        for program in self.programs.list_by_institution(institution_id)? {
            for level in self.levels.list_by_program(program.id)? {
                all.extend(self.subjects.list_by_level(level.id)?);
            }
        }
        Ok(all)
    }

    /// Number of programs owned by an institution.
    pub fn program_count(&self, institution_id: InstitutionId) -> RepoResult<u64> {
        self.programs.count_by_institution(institution_id)
    }

    /// Builds the structure page model for an institution.
    pub fn structure(
        &self,
        institution_id: InstitutionId,
        program_id: Option<ProgramId>,
        level_id: Option<LevelId>,
    ) -> RepoResult<CatalogStructure> {
        let programs = self.programs(institution_id)?;
        let levels = program_id.map(|id| self.levels(id)).transpose()?;
        let subjects = level_id.map(|id| self.subjects(id)).transpose()?;

        Ok(CatalogStructure {
            institution_id,
            programs,
            selected_program_id: program_id,
            levels,
            selected_level_id: level_id,
            subjects,
        })
    }

    /// Creates a program with a trimmed name.
    pub fn add_program(&self, institution_id: InstitutionId, name: &str) -> RepoResult<Program> {
        let program = self.programs.create_program(institution_id, name.trim())?;
        info!(
            "event=catalog_add_program module=catalog status=ok institution_id={} program_id={}",
            institution_id, program.id
        );
        Ok(program)
    }

    /// Creates an academic level with a trimmed label.
    pub fn add_level(&self, program_id: ProgramId, label: &str) -> RepoResult<AcademicLevel> {
        let level = self.levels.create_level(program_id, label.trim())?;
        info!(
            "event=catalog_add_level module=catalog status=ok program_id={} level_id={}",
            program_id, level.id
        );
        Ok(level)
    }

    /// Creates a subject with a trimmed name.
    pub fn add_subject(&self, level_id: LevelId, name: &str) -> RepoResult<Subject> {
        let subject = self.subjects.create_subject(level_id, name.trim())?;
        info!(
            "event=catalog_add_subject module=catalog status=ok level_id={} subject_id={}",
            level_id, subject.id
        );
        Ok(subject)
    }

    /// Looks a subject up by id; `None` when it does not exist.
    pub fn get_subject_by_id(&self, subject_id: SubjectId) -> RepoResult<Option<Subject>> {
        self.subjects.get_subject(subject_id)
    }
}
