/// Runtime configuration for JWT verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Expected issuer claim (iss).
    pub issuer: String,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with exact expiry checking (zero leeway).
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            leeway_seconds: 0,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}
