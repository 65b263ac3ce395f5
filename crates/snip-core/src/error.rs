use thiserror::Error;

/// Result type for store and seed operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reasons a string is not a well-formed short code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("short code must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("short code contains a character outside the base62 alphabet: {0:?}")]
    InvalidCharacter(char),
    #[error("unsupported code length {length}; expected {min}..={max}")]
    UnsupportedLength { length: usize, min: usize, max: usize },
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}
