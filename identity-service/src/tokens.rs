use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::store::Account;

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub issuer: String,
    pub access_ttl_seconds: i64,
}

/// Signs access tokens with the process-wide HS256 secret.
///
/// The role claim is captured at issuance: granting admin to an account
/// does not upgrade tokens it already holds, only ones minted afterwards.
pub struct TokenSigner {
    config: TokenConfig,
    encoding_key: EncodingKey,
}

pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct AccessClaims<'a> {
    sub: String,
    adm: bool,
    iss: &'a str,
    exp: i64,
    iat: i64,
    jti: String,
}

impl TokenSigner {
    pub fn new(secret: &[u8], config: TokenConfig) -> Self {
        Self {
            config,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, account: &Account) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.access_ttl_seconds);

        let claims = AccessClaims {
            sub: account.id.to_string(),
            adm: account.is_admin,
            iss: &self.config.issuer,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| anyhow!("failed to sign access token: {err}"))?;

        Ok(IssuedToken { token, expires_at })
    }
}
