use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::claims::Claims;

/// Capability a route requires before its handler runs.
///
/// Modeled as an explicit tag per route rather than a hierarchy of
/// permission types; handlers state what they need and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A verified token is sufficient.
    Authenticated,
    /// The token's role claim must carry admin privilege.
    Admin,
}

/// Authorization failure: the caller is authenticated but not allowed.
/// Always a 403, distinct from the 401 token errors.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    #[error("administrator privileges are required for this request")]
    Forbidden,
}

pub fn ensure_capability(claims: &Claims, capability: Capability) -> Result<(), GuardError> {
    match capability {
        Capability::Authenticated => Ok(()),
        Capability::Admin if claims.is_admin => Ok(()),
        Capability::Admin => Err(GuardError::Forbidden),
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

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: "ACCESS_DENIED",
                message: self.to_string(),
            },
        };
        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}
