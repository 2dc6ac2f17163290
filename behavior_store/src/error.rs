//! Error types for store and codec operations.

use thiserror::Error;

use crate::props::PropType;

/// Errors raised by the database and the property codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The requested ID is absent from the store (or catalog).
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },

    /// An assigned value's runtime type disagrees with its declared type.
    /// Raised by explicit validation only - stale assignments are tolerated
    /// until validation is requested.
    #[error("property {property}: expected {expected}, got {found}")]
    TypeMismatch {
        property: String,
        expected: PropType,
        found: String,
    },

    /// A legacy property-comment line could not be parsed. Callers log and
    /// skip the offending declaration; this is never fatal.
    #[error("could not parse property declaration: {line}")]
    MalformedSource { line: String },
}

impl StoreError {
    /// Shorthand for a `NotFound` with a displayable ID.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
