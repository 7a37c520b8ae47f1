//! Request bodies for catalog writes and their validation rules.
//!
//! Rules mirror the storage column widths: program names up to 160
//! characters, level labels up to 80, subject names up to 120. Blank values
//! are rejected before the service is called.

use catalog_core::CatalogError;
use serde::Deserialize;

pub const PROGRAM_NAME_MAX_CHARS: usize = 160;
pub const LEVEL_LABEL_MAX_CHARS: usize = 80;
pub const SUBJECT_NAME_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelForm {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectForm {
    #[serde(default)]
    pub name: String,
}

impl ProgramForm {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require_text("name", &self.name, PROGRAM_NAME_MAX_CHARS)
    }
}

impl LevelForm {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require_text("label", &self.label, LEVEL_LABEL_MAX_CHARS)
    }
}

impl SubjectForm {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require_text("name", &self.name, SUBJECT_NAME_MAX_CHARS)
    }
}

// Length is checked on the raw value; the service trims afterwards.
fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} must not be blank")));
    }
    let chars = value.chars().count();
    if chars > max_chars {
        return Err(CatalogError::Validation(format!(
            "{field} must be at most {max_chars} characters, got {chars}"
        )));
    }
    Ok(())
}
