//! Institution search entry points.
//!
//! Search runs in application code so that case folding is Unicode-aware
//! (SQLite's `lower()` only folds ASCII).

pub mod institution_search;
