//! Catalog schema versions.
//!
//! Each step is an embedded SQL script keyed by the `user_version` it
//! produces. Steps only ever get appended.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "catalog",
    sql: include_str!("0001_catalog.sql"),
}];

/// Schema version a fully migrated catalog database reports.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the catalog schema on `conn` up to [`latest_version`].
///
/// All outstanding steps share one transaction, so a failing script leaves
/// the database exactly as it was.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let to_version = latest_version();
    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    let outstanding: Vec<&SchemaStep> = steps_after(from_version).collect();
    if outstanding.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &outstanding {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    let names: Vec<&str> = outstanding.iter().map(|step| step.name).collect();
    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        from_version,
        to_version,
        names.join(",")
    );
    Ok(())
}

fn steps_after(version: u32) -> impl Iterator<Item = &'static SchemaStep> {
    SCHEMA_STEPS.iter().filter(move |step| step.version > version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, steps_after, SCHEMA_STEPS};

    #[test]
    fn step_versions_start_at_one_and_increase_by_one() {
        for (index, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
    }

    #[test]
    fn nothing_is_outstanding_at_latest_version() {
        assert_eq!(steps_after(0).count(), SCHEMA_STEPS.len());
        assert_eq!(steps_after(latest_version()).count(), 0);
    }
}
