use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::JwtConfig;
use crate::error::TokenResult;

/// Verifies HS256 bearer tokens signed with the process-wide secret.
///
/// Verification is pure computation: no I/O, no blocking, so it is safe to
/// run inline in request extractors.
#[derive(Clone)]
pub struct TokenVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(secret: &[u8], config: JwtConfig) -> Self {
        Self {
            config,
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn verify(&self, token: &str) -> TokenResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.validate_aud = false;
        validation.leeway = self.config.leeway_seconds.into();

        let token_data = decode::<Value>(token, &self.decoding_key, &validation)?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(subject = %claims.subject, "verified bearer token");
        Ok(claims)
    }
}
