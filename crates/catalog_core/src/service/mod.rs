//! Catalog use-case services.
//!
//! Services orchestrate repository calls and keep callers decoupled from
//! storage details.

pub mod catalog_service;
