//! Catalog failure taxonomy and its HTTP classification.
//!
//! # Responsibility
//! - Tag failures at the point they happen (`Forbidden`, `NotFound`,
//!   `Validation`, `Internal`).
//! - Map a tag to an HTTP status and error view with [`classify`].
//! - Recover a tag from message-only "illegal argument" failures raised by
//!   older callers ([`CatalogError::from_illegal_argument`]).
//!
//! # Invariants
//! - Messages are carried verbatim; classification never rewrites them.
//! - `Validation` answers status 400 with the `error/404` view. There is no
//!   400-specific view; keep the pair stable for existing clients.

use crate::db::DbError;
use crate::repo::RepoError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"accès|refus|interdit").expect("valid forbidden keyword regex"));
static NOT_FOUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"introuvable|inexistant|not found").expect("valid not-found keyword regex")
});

/// Classified catalog failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Caller may not access the target.
    Forbidden(String),
    /// Target does not exist.
    NotFound(String),
    /// Input rejected.
    Validation(String),
    /// Anything unexpected, including storage failures.
    Internal(String),
}

impl CatalogError {
    /// Classifies a message-only invalid-argument failure by keyword.
    ///
    /// A missing message is treated as empty. Matching is done on the
    /// lower-cased message: access wording (`accès`, `refus`, `interdit`)
    /// wins over not-found wording (`introuvable`, `inexistant`,
    /// `not found`); everything else is a validation failure.
    pub fn from_illegal_argument(message: Option<&str>) -> Self {
        let message = message.unwrap_or_default().to_string();
        let lower = message.to_lowercase();
        if FORBIDDEN_RE.is_match(&lower) {
            Self::Forbidden(message)
        } else if NOT_FOUND_RE.is_match(&lower) {
            Self::NotFound(message)
        } else {
            Self::Validation(message)
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Validation(message)
            | Self::Internal(message) => message,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for CatalogError {}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

/// Error view rendered for a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorView {
    Forbidden,
    NotFound,
    Internal,
}

impl ErrorView {
    /// Template identifier of the view.
    pub fn template(self) -> &'static str {
        match self {
            Self::Forbidden => "error/403",
            Self::NotFound => "error/404",
            Self::Internal => "error/500",
        }
    }
}

/// Status, view and message to render for one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub status: u16,
    pub view: ErrorView,
    pub message: String,
}

/// Maps a classified failure to its error page.
pub fn classify(error: &CatalogError) -> ErrorPage {
    let (status, view) = match error {
        CatalogError::Forbidden(_) => (403, ErrorView::Forbidden),
        CatalogError::NotFound(_) => (404, ErrorView::NotFound),
        CatalogError::Validation(_) => (400, ErrorView::NotFound),
        CatalogError::Internal(_) => (500, ErrorView::Internal),
    };

    ErrorPage {
        status,
        view,
        message: error.message().to_string(),
    }
}
