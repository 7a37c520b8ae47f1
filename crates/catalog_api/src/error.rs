//! HTTP rendering of classified catalog failures.
//!
//! # Invariants
//! - Status and view come from `catalog_core::classify`; nothing here
//!   re-derives them.
//! - The failure message reaches the page unmodified apart from HTML
//!   escaping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use catalog_core::logging::sanitize_message;
use catalog_core::{classify, CatalogError, ErrorPage};
use log::{error, warn};

const MAX_LOGGED_MESSAGE_CHARS: usize = 160;

/// Failure returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self(CatalogError::Validation(value.body_text()))
    }
}

// Unparseable ids and query values classify as internal failures.
impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self(CatalogError::Internal(value.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self(CatalogError::Internal(value.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let page = classify(&self.0);
        let logged = sanitize_message(&page.message, MAX_LOGGED_MESSAGE_CHARS);
        if page.status >= 500 {
            error!(
                "event=request_failed module=api status=error http_status={} view={} error={}",
                page.status,
                page.view.template(),
                logged
            );
        } else {
            warn!(
                "event=request_failed module=api status=rejected http_status={} view={} error={}",
                page.status,
                page.view.template(),
                logged
            );
        }

        let status =
            StatusCode::from_u16(page.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Html(render_error_page(&page))).into_response()
    }
}

/// Renders the minimal HTML page standing in for the error templates.
pub fn render_error_page(page: &ErrorPage) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"fr\">\n\
         <head><meta charset=\"utf-8\"><title>{status}</title></head>\n\
         <body data-view=\"{view}\">\n\
         <h1>{status}</h1>\n\
         <p class=\"error-message\">{message}</p>\n\
         </body>\n\
         </html>\n",
        status = page.status,
        view = page.view.template(),
        message = escape_html(&page.message),
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
