//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping transitions and submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// No field with this id exists in the mapping.
    #[error("field not found: {0}")]
    UnknownField(String),
    /// The requested slug is disabled or not a string field.
    #[error("field '{0}' cannot be used as slug field")]
    IneligibleSlug(String),
    /// Submission requires a slug field.
    #[error("no slug field selected")]
    MissingSlugField,
    /// A submission is already pending.
    #[error("a submission is already in progress")]
    SubmissionInFlight,
}
