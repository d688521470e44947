use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TokenError, TokenResult};

/// Application-focused representation of verified JWT claims.
///
/// `is_admin` reflects the account's role at issuance time; a role change
/// only shows up in tokens minted after it.
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub subject: Uuid,
    pub is_admin: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub issuer: String,
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    sub: String,
    #[serde(default)]
    adm: bool,
    exp: i64,
    iat: i64,
    iss: String,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = TokenError;

    fn try_from(value: ClaimsRepr) -> TokenResult<Self> {
        let subject = Uuid::parse_str(&value.sub)
            .map_err(|_| TokenError::Invalid(format!("claim 'sub' is not a uuid: {}", value.sub)))?;

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| TokenError::Invalid(format!("claim 'exp' out of range: {}", value.exp)))?;

        let issued_at = Utc
            .timestamp_opt(value.iat, 0)
            .single()
            .ok_or_else(|| TokenError::Invalid(format!("claim 'iat' out of range: {}", value.iat)))?;

        Ok(Self {
            subject,
            is_admin: value.adm,
            issued_at,
            expires_at,
            issuer: value.iss,
        })
    }
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = TokenError;

    fn try_from(value: serde_json::Value) -> TokenResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value)
            .map_err(|err| TokenError::Invalid(format!("malformed claim payload: {err}")))?;
        Claims::try_from(repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_payload() {
        let subject = Uuid::new_v4();
        let payload = json!({
            "sub": subject.to_string(),
            "adm": true,
            "exp": 1_700_000_600,
            "iat": 1_700_000_000,
            "iss": "identity-service",
        });

        let claims = Claims::try_from(payload).expect("claims parse");
        assert_eq!(claims.subject, subject);
        assert!(claims.is_admin);
        assert_eq!(claims.issuer, "identity-service");
        assert_eq!(claims.expires_at.timestamp(), 1_700_000_600);
    }

    #[test]
    fn adm_defaults_to_false() {
        let payload = json!({
            "sub": Uuid::new_v4().to_string(),
            "exp": 1_700_000_600,
            "iat": 1_700_000_000,
            "iss": "identity-service",
        });

        let claims = Claims::try_from(payload).expect("claims parse");
        assert!(!claims.is_admin);
    }

    #[test]
    fn rejects_non_uuid_subject() {
        let payload = json!({
            "sub": "not-a-uuid",
            "exp": 1_700_000_600,
            "iat": 1_700_000_000,
            "iss": "identity-service",
        });

        let err = Claims::try_from(payload).expect_err("should reject");
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn rejects_missing_subject() {
        let payload = json!({
            "exp": 1_700_000_600,
            "iat": 1_700_000_000,
            "iss": "identity-service",
        });

        let err = Claims::try_from(payload).expect_err("should reject");
        assert!(matches!(err, TokenError::Invalid(_)));
    }
}
