//! Error types for itl-scout
//!
//! Record-layer errors ([`ModelError`]) signal misuse and are returned to
//! the caller immediately. Remote errors ([`FetchError`]) are absorbed per
//! task by the enricher.

use crate::model::Category;
use std::time::Duration;
use thiserror::Error;

/// Roster and entity errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed construction input (wrong roster size, unknown region...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write to a collection that has already been set
    #[error("Invariant violation: {category} collection of '{entity}' is already set")]
    InvariantViolation { entity: String, category: Category },
}

/// Champion name/id translation errors
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Unknown champion name: {0}")]
    UnknownName(String),

    #[error("Unknown champion id: {0}")]
    UnknownId(u32),
}

/// Remote data source errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data found for {0}")]
    NotFound(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}
