//! Program / level / subject repositories and their SQLite implementations.
//!
//! # Invariants
//! - Programs list by `name ASC`, levels by `label ASC`, subjects by
//!   `name ASC`; ties fall back to `id ASC`.
//! - Create paths store the value they are given; trimming is a service
//!   concern.

use crate::model::catalog::{AcademicLevel, LevelId, Program, ProgramId, Subject, SubjectId};
use crate::model::institution::InstitutionId;
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Params, Row, Transaction, TransactionBehavior};

/// Storage contract for programs.
pub trait ProgramRepository {
    /// Programs of one institution ordered by name.
    fn list_by_institution(&self, institution_id: InstitutionId) -> RepoResult<Vec<Program>>;
    /// Number of programs owned by one institution.
    fn count_by_institution(&self, institution_id: InstitutionId) -> RepoResult<u64>;
    /// Persists a program and returns it with its assigned id.
    fn create_program(&self, institution_id: InstitutionId, name: &str) -> RepoResult<Program>;
}

/// Storage contract for academic levels.
pub trait LevelRepository {
    /// Levels of one program ordered by label.
    fn list_by_program(&self, program_id: ProgramId) -> RepoResult<Vec<AcademicLevel>>;
    /// Persists a level and returns it with its assigned id.
    fn create_level(&self, program_id: ProgramId, label: &str) -> RepoResult<AcademicLevel>;
}

/// Storage contract for subjects.
pub trait SubjectRepository {
    /// Subjects of one level ordered by name.
    fn list_by_level(&self, level_id: LevelId) -> RepoResult<Vec<Subject>>;
    /// Looks a subject up by primary key.
    fn get_subject(&self, subject_id: SubjectId) -> RepoResult<Option<Subject>>;
    /// Persists a subject and returns it with its assigned id.
    fn create_subject(&self, level_id: LevelId, name: &str) -> RepoResult<Subject>;
}

/// SQLite-backed program repository.
pub struct SqliteProgramRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgramRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProgramRepository for SqliteProgramRepository<'_> {
    fn list_by_institution(&self, institution_id: InstitutionId) -> RepoResult<Vec<Program>> {
        query_list(
            self.conn,
            "SELECT id, institution_id, name
             FROM program
             WHERE institution_id = ?1
             ORDER BY name ASC, id ASC;",
            [institution_id],
            parse_program_row,
        )
    }

    fn count_by_institution(&self, institution_id: InstitutionId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM program WHERE institution_id = ?1;",
            [institution_id],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn create_program(&self, institution_id: InstitutionId, name: &str) -> RepoResult<Program> {
        insert_returning(
            self.conn,
            "INSERT INTO program (institution_id, name)
             VALUES (?1, ?2)
             RETURNING id, institution_id, name;",
            params![institution_id, name],
            parse_program_row,
        )
    }
}

/// SQLite-backed academic level repository.
pub struct SqliteLevelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLevelRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LevelRepository for SqliteLevelRepository<'_> {
    fn list_by_program(&self, program_id: ProgramId) -> RepoResult<Vec<AcademicLevel>> {
        query_list(
            self.conn,
            "SELECT id, program_id, label
             FROM academic_level
             WHERE program_id = ?1
             ORDER BY label ASC, id ASC;",
            [program_id],
            parse_level_row,
        )
    }

    fn create_level(&self, program_id: ProgramId, label: &str) -> RepoResult<AcademicLevel> {
        insert_returning(
            self.conn,
            "INSERT INTO academic_level (program_id, label)
             VALUES (?1, ?2)
             RETURNING id, program_id, label;",
            params![program_id, label],
            parse_level_row,
        )
    }
}

/// SQLite-backed subject repository.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn list_by_level(&self, level_id: LevelId) -> RepoResult<Vec<Subject>> {
        query_list(
            self.conn,
            "SELECT id, level_id, name
             FROM subject
             WHERE level_id = ?1
             ORDER BY name ASC, id ASC;",
            [level_id],
            parse_subject_row,
        )
    }

    fn get_subject(&self, subject_id: SubjectId) -> RepoResult<Option<Subject>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, level_id, name FROM subject WHERE id = ?1;")?;
        let mut rows = stmt.query([subject_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_subject_row(row)?));
        }

        Ok(None)
    }

    fn create_subject(&self, level_id: LevelId, name: &str) -> RepoResult<Subject> {
        insert_returning(
            self.conn,
            "INSERT INTO subject (level_id, name)
             VALUES (?1, ?2)
             RETURNING id, level_id, name;",
            params![level_id, name],
            parse_subject_row,
        )
    }
}

fn query_list<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

// Runs one `INSERT ... RETURNING` statement under an immediate transaction.
// Dropping the transaction on error rolls it back.
fn insert_returning<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RepoResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let created = tx.query_row(sql, params, parse)?;
    tx.commit()?;
    Ok(created)
}

fn parse_program_row(row: &Row<'_>) -> rusqlite::Result<Program> {
    Ok(Program {
        id: row.get("id")?,
        institution_id: row.get("institution_id")?,
        name: row.get("name")?,
    })
}

fn parse_level_row(row: &Row<'_>) -> rusqlite::Result<AcademicLevel> {
    Ok(AcademicLevel {
        id: row.get("id")?,
        program_id: row.get("program_id")?,
        label: row.get("label")?,
    })
}

fn parse_subject_row(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get("id")?,
        level_id: row.get("level_id")?,
        name: row.get("name")?,
    })
}
