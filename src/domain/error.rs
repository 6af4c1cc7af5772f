//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rejected input at the boundary of the core.
///
/// The forest operations themselves never fail; these come from drafts,
/// updates and value parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("name is required")]
    EmptyName,

    #[error("id must not be blank")]
    EmptyId,

    #[error("id already exists in the hierarchy: {0}")]
    DuplicateId(String),

    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("reading must be a finite, non-negative number: {0}")]
    InvalidReading(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("could not generate a free id with prefix {prefix} after {attempts} attempts")]
    IdGenerationExhausted { prefix: String, attempts: usize },
}
