use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_engine::{CreateError, ResolveError};
use tracing::warn;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request body was not the expected JSON document.
    InvalidBody(JsonRejection),
    Create(CreateError),
    Resolve(ResolveError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Create(CreateError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            AppError::Create(CreateError::ExhaustedRetries { .. })
            | AppError::Create(CreateError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Resolve(ResolveError::InvalidCode(_)) => StatusCode::BAD_REQUEST,
            AppError::Resolve(ResolveError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Resolve(ResolveError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidBody(_) => "invalid body".to_string(),
            AppError::Create(error) => error.to_string(),
            AppError::Resolve(error) => error.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

impl From<CreateError> for AppError {
    fn from(error: CreateError) -> Self {
        AppError::Create(error)
    }
}

impl From<ResolveError> for AppError {
    fn from(error: ResolveError) -> Self {
        AppError::Resolve(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.message();

        if status.is_server_error() {
            warn!(status = status.as_u16(), %error, "request failed");
        }

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::CodeError;

    #[test]
    fn status_codes() {
        let cases = [
            (
                AppError::Create(CreateError::InvalidUrl("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Create(CreateError::ExhaustedRetries { attempts: 10 }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Create(CreateError::StoreUnavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Resolve(ResolveError::InvalidCode(CodeError::InvalidCharacter('!'))),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Resolve(ResolveError::NotFound), StatusCode::NOT_FOUND),
            (
                AppError::Resolve(ResolveError::StoreUnavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
