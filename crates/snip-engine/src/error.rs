use snip_core::{CodeError, StoreError};
use thiserror::Error;

/// Failures of [`Shortener::create`](crate::Shortener::create).
#[derive(Debug, Clone, Error)]
pub enum CreateError {
    /// The input is not an absolute http(s) URL. Not retried.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Every attempt hit an occupied code; the code space is under pressure.
    #[error("no free short code after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
    /// The store failed or timed out. Safe to retry with backoff.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Failures of [`Shortener::resolve`](crate::Shortener::resolve).
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// Wrong length or a character outside the alphabet; the store was not consulted.
    #[error("invalid short code: {0}")]
    InvalidCode(#[from] CodeError),
    /// No mapping exists for the code. An empty result rather than a fault.
    #[error("short code not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CreateError {
    fn from(error: StoreError) -> Self {
        CreateError::StoreUnavailable(error.to_string())
    }
}

impl From<StoreError> for ResolveError {
    fn from(error: StoreError) -> Self {
        ResolveError::StoreUnavailable(error.to_string())
    }
}
