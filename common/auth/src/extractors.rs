use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::claims::Claims;
use crate::error::{TokenError, TokenResult};
use crate::verifier::TokenVerifier;

/// Extracts verified claims from the request's bearer credential.
///
/// Rejection maps straight onto the token error taxonomy: an absent
/// Authorization header is `TOKEN_NOT_FOUND`, anything unverifiable is
/// `INVALID_TOKEN` or `TOKEN_EXPIRED`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
    pub token: String,
}

impl AuthContext {
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TokenError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(TokenError::Missing)?;

        let token = parse_bearer(header_value)?;
        let claims = verifier.verify(&token)?;

        Ok(Self { claims, token })
    }
}

fn parse_bearer(value: &axum::http::HeaderValue) -> TokenResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| TokenError::Invalid("authorization header is not valid text".into()))?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| TokenError::Invalid("authorization header is not a bearer credential".into()))?
        .trim();

    if token.is_empty() {
        return Err(TokenError::Invalid("bearer credential is empty".into()));
    }

    Ok(token.to_owned())
}
