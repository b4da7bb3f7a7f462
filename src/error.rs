//! Error taxonomy shared by the solver and the rate fetcher.
//!
//! Each variant carries the human-readable message written at the raise
//! site; the variant itself is the machine-readable kind. All operations
//! fail fast and surface the first error encountered.

use thiserror::Error;

use crate::trace::Traceable;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A value is not the expected numeric kind.
    #[error("{0}")]
    TypeMismatch(String),

    /// A numeric value is outside the operation's valid domain.
    #[error("{0}")]
    InvalidArgument(String),

    /// The external rate source could not be reached, timed out, or
    /// answered with a failure status.
    #[error("{0}")]
    SourceUnavailable(String),

    /// The rate source's payload could not be parsed as JSON.
    #[error("{0}")]
    MalformedResponse(String),

    /// A required key is absent from a parsed structure.
    #[error("{0}")]
    MissingField(String),
}

impl Traceable for CoreError {
    fn kind(&self) -> &'static str {
        match self {
            CoreError::TypeMismatch(_) => "TypeMismatch",
            CoreError::InvalidArgument(_) => "InvalidArgument",
            CoreError::SourceUnavailable(_) => "SourceUnavailable",
            CoreError::MalformedResponse(_) => "MalformedResponse",
            CoreError::MissingField(_) => "MissingField",
        }
    }
}
