//! Institution domain model.
//!
//! Institutions are read-only from the catalog's point of view; they own
//! programs but are never modified by catalog operations.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type InstitutionId = i64;

/// Category of an institution.
///
/// Serialized and stored as its upper-case token (`UNIVERSITE`, `ECOLE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstitutionType {
    Universite,
    Ecole,
    Lycee,
    College,
}

impl InstitutionType {
    /// Stable upper-case token used in storage and transport records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Universite => "UNIVERSITE",
            Self::Ecole => "ECOLE",
            Self::Lycee => "LYCEE",
            Self::College => "COLLEGE",
        }
    }

    /// Parses a stored token. Matching is exact, as for the stored form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "UNIVERSITE" => Some(Self::Universite),
            "ECOLE" => Some(Self::Ecole),
            "LYCEE" => Some(Self::Lycee),
            "COLLEGE" => Some(Self::College),
            _ => None,
        }
    }
}

impl Display for InstitutionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Institution record as seen by catalog and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: Option<InstitutionType>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Insert payload for an institution; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewInstitution {
    pub name: String,
    pub kind: Option<InstitutionType>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::InstitutionType;

    #[test]
    fn type_tokens_parse_back() {
        for kind in [
            InstitutionType::Universite,
            InstitutionType::Ecole,
            InstitutionType::Lycee,
            InstitutionType::College,
        ] {
            assert_eq!(InstitutionType::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_lowercase_and_unknown_tokens() {
        assert_eq!(InstitutionType::parse("universite"), None);
        assert_eq!(InstitutionType::parse("ACADEMIE"), None);
    }

    #[test]
    fn serde_uses_uppercase_token() {
        let json = serde_json::to_string(&InstitutionType::Lycee).unwrap();
        assert_eq!(json, "\"LYCEE\"");
    }
}
