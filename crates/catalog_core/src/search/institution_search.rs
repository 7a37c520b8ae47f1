//! Case-insensitive institution lookup by name or city.
//!
//! # Invariants
//! - Queries shorter than [`MIN_QUERY_CHARS`] after trimming never reach
//!   storage.
//! - Matching uses the lower-cased, untrimmed query as a substring.
//! - Results keep storage order and are capped at [`MAX_RESULTS`].

use crate::model::institution::{Institution, InstitutionId};
use crate::repo::institution_repo::InstitutionRepository;
use crate::repo::RepoResult;
use log::debug;
use serde::{Deserialize, Serialize};

/// Minimum trimmed query length, in characters.
pub const MIN_QUERY_CHARS: usize = 2;
/// Maximum number of summaries returned.
pub const MAX_RESULTS: usize = 10;

/// Transport projection of an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionSummary {
    pub id: InstitutionId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<Institution> for InstitutionSummary {
    fn from(value: Institution) -> Self {
        Self {
            id: value.id,
            name: value.name,
            kind: value.kind.map(|kind| kind.as_str().to_string()),
            city: value.city,
            country: value.country,
        }
    }
}

/// Searches institutions whose name or city contains `query`.
///
/// Returns an empty list for a missing, blank or too-short query without
/// touching `repo`.
pub fn search_institutions<R>(repo: &R, query: Option<&str>) -> RepoResult<Vec<InstitutionSummary>>
where
    R: InstitutionRepository + ?Sized,
{
    let Some(query) = query.filter(|query| is_searchable(query)) else {
        return Ok(Vec::new());
    };

    let needle = query.to_lowercase();
    let hits = repo.find_matching(
        &|institution: &Institution| matches_institution(institution, &needle),
        MAX_RESULTS,
    )?;
    debug!(
        "event=institution_search module=search status=ok query_chars={} hits={}",
        query.chars().count(),
        hits.len()
    );

    Ok(hits.into_iter().map(InstitutionSummary::from).collect())
}

/// Whether `query` is long enough, once trimmed, to be worth a lookup.
///
/// Only ASCII control characters and spaces are trimmed, and length is
/// counted in UTF-16 code units, so a lone non-breaking space still counts.
pub fn is_searchable(query: &str) -> bool {
    query
        .trim_matches(|ch: char| ch <= ' ')
        .encode_utf16()
        .count()
        >= MIN_QUERY_CHARS
}

/// Whether the institution's name or city contains the already lower-cased
/// `needle`. A missing city never matches.
pub fn matches_institution(institution: &Institution, needle: &str) -> bool {
    institution.name.to_lowercase().contains(needle)
        || institution
            .city
            .as_deref()
            .is_some_and(|city| city.to_lowercase().contains(needle))
}
