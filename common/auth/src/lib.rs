pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod verifier;

pub use claims::Claims;
pub use config::JwtConfig;
pub use error::{TokenError, TokenResult};
pub use extractors::AuthContext;
pub use guards::{ensure_capability, Capability, GuardError};
pub use verifier::TokenVerifier;
