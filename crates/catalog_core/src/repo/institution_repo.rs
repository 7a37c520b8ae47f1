//! Institution repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the full-collection read used by institution search.
//! - Provide a bounded matching scan so search does not have to load every
//!   row.
//! - Provide the insert path used by seeding tools.
//!
//! # Invariants
//! - Iteration order is storage order (`id ASC` for SQLite).
//! - Unknown `type` tokens are reported as invalid data, never dropped.

use crate::model::institution::{Institution, InstitutionType, NewInstitution};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const INSTITUTION_SELECT_SQL: &str = "SELECT
    id,
    name,
    type,
    city,
    country
FROM institution";

/// Storage contract for institutions.
pub trait InstitutionRepository {
    /// Returns every institution in storage order.
    fn find_all(&self) -> RepoResult<Vec<Institution>>;

    /// Returns at most `limit` institutions accepted by `matches`, in storage
    /// order.
    ///
    /// The default implementation filters [`InstitutionRepository::find_all`]
    /// in memory. Backends that can stream rows should override it.
    fn find_matching(
        &self,
        matches: &dyn Fn(&Institution) -> bool,
        limit: usize,
    ) -> RepoResult<Vec<Institution>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|institution| matches(institution))
            .take(limit)
            .collect())
    }

    /// Persists an institution and returns it with its assigned id.
    fn create_institution(&self, institution: &NewInstitution) -> RepoResult<Institution>;
}

/// SQLite-backed institution repository.
pub struct SqliteInstitutionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInstitutionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InstitutionRepository for SqliteInstitutionRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Institution>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INSTITUTION_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut institutions = Vec::new();
        while let Some(row) = rows.next()? {
            institutions.push(parse_institution_row(row)?);
        }
        Ok(institutions)
    }

    fn find_matching(
        &self,
        matches: &dyn Fn(&Institution) -> bool,
        limit: usize,
    ) -> RepoResult<Vec<Institution>> {
        let mut found = Vec::new();
        if limit == 0 {
            return Ok(found);
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{INSTITUTION_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let institution = parse_institution_row(row)?;
            if matches(&institution) {
                found.push(institution);
                if found.len() == limit {
                    break;
                }
            }
        }
        Ok(found)
    }

    fn create_institution(&self, institution: &NewInstitution) -> RepoResult<Institution> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let id: i64 = tx.query_row(
            "INSERT INTO institution (name, type, city, country)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id;",
            params![
                institution.name.as_str(),
                institution.kind.map(InstitutionType::as_str),
                institution.city.as_deref(),
                institution.country.as_deref(),
            ],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(Institution {
            id,
            name: institution.name.clone(),
            kind: institution.kind,
            city: institution.city.clone(),
            country: institution.country.clone(),
        })
    }
}

fn parse_institution_row(row: &Row<'_>) -> RepoResult<Institution> {
    let kind = match row.get::<_, Option<String>>("type")? {
        Some(value) => Some(InstitutionType::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid institution type `{value}` in institution.type"
            ))
        })?),
        None => None,
    };

    Ok(Institution {
        id: row.get("id")?,
        name: row.get("name")?,
        kind,
        city: row.get("city")?,
        country: row.get("country")?,
    })
}
