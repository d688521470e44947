use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type TokenResult<T> = Result<T, TokenError>;

/// Failure modes of bearer-token extraction and verification.
///
/// `Expired` is kept distinct from `Invalid` so clients can tell
/// "re-authenticate" apart from "your request is malformed".
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no bearer token was presented")]
    Missing,
    #[error("token is invalid: {0}")]
    Invalid(String),
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Stable machine-readable code used in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Missing => "TOKEN_NOT_FOUND",
            TokenError::Invalid(_) => "INVALID_TOKEN",
            TokenError::Expired => "TOKEN_EXPIRED",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        match value.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(value.to_string()),
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

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
