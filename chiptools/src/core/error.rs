//! Error types for table cleanup operations.

/// Result type for cleanup operations
pub type CleanupResult<T> = Result<T, CleanupError>;

/// Error type for cleanup operations
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    /// The input table cannot be processed as given (ragged rows, row-keys
    /// that cannot be ordered against each other).
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    /// A supplied constant mapping already holds the reserved label key.
    #[error("Mapping collision: {0}")]
    MappingCollision(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
