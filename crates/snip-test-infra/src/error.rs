use std::result::Result as StdResult;
use thiserror::Error;

/// Errors raised while provisioning test infrastructure.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("container error: {0}")]
    Container(#[from] testcontainers::TestcontainersError),
    #[error("mysql did not accept connections after {attempts} attempts: {source}")]
    NotReady {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}

pub type Result<T> = StdResult<T, TestInfraError>;
