use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_auth::{GuardError, TokenError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Boundary error type: every failure a handler can produce maps onto a
/// fixed {code, message, status} triple here. Token-extraction failures
/// short-circuit in `common-auth` with the same envelope shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    UserAlreadyExists(&'static str),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("administrator privileges are required for this request")]
    AccessDenied,
    #[error("no account exists with the requested id")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<GuardError> for ApiError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::Forbidden => Self::AccessDenied,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate => {
                Self::UserAlreadyExists("username or nickname is already taken")
            }
            StoreError::Backend(err) => Self::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Token(_) => StatusCode::UNAUTHORIZED,
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Token(token) => token.code(),
            ApiError::AccessDenied => "ACCESS_DENIED",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Internal(_) => "SERVER_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct BareMessage {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // NotFound keeps the legacy bare {"message"} body with no envelope;
        // existing clients parse it that way.
        if let ApiError::NotFound = self {
            let body = BareMessage {
                message: self.to_string(),
            };
            return (StatusCode::NOT_FOUND, Json(body)).into_response();
        }

        let message = match &self {
            ApiError::Internal(err) => {
                error!(error = %err, "request failed with internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
