//! Error types for xrb-core.

use thiserror::Error;

/// Result type alias for xrb operations.
pub type Result<T> = std::result::Result<T, XrbError>;

/// Main error type for the xrb library.
#[derive(Debug, Error)]
pub enum XrbError {
    /// Initial values and descriptions were built from different key sets.
    #[error("initial values and descriptions do not have the same keys")]
    SchemaMismatch,

    /// Access to a field outside the frozen field set.
    #[error("'{0}' is not a valid field")]
    UnknownField(String),

    /// Attempt to add or remove a field after construction.
    #[error("fields are fixed at construction and cannot be added or removed")]
    ImmutableSchema,

    /// Template text contains an unbalanced or unparsable descriptor.
    #[error("malformed template: {0}")]
    MalformedTemplate(String),

    /// Render was attempted while a field had no value.
    #[error("no data set for field '{0}'")]
    MissingData(String),

    /// Parse exhausted its input before matching every field.
    /// Carries the unmatched field names in search order.
    #[error("fields not found in input, remaining in search order: {0:?}")]
    FieldsNotFound(Vec<String>),

    /// A value or line pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
