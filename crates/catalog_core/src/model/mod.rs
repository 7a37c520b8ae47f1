//! Domain model for institutions and their academic catalog.
//!
//! # Invariants
//! - Every catalog record is identified by a storage-assigned `i64` id.
//! - Catalog records reference exactly one parent: Program → Institution,
//!   AcademicLevel → Program, Subject → AcademicLevel.

pub mod catalog;
pub mod institution;
