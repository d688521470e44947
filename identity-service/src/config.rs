use anyhow::{anyhow, Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_issuer: String,
    pub access_ttl_seconds: i64,
    pub leeway_seconds: u32,
}

impl ServiceConfig {
    pub fn secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

pub fn load_service_config() -> Result<ServiceConfig> {
    let bind_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let bind_port = env::var("PORT")
        .ok()
        .map(|value| parse_port(&value))
        .transpose()
        .context("Failed to parse PORT")?
        .unwrap_or(8086);

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let jwt_secret = env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET must be set")?;
    if jwt_secret.trim().is_empty() {
        return Err(anyhow!("AUTH_JWT_SECRET must not be empty"));
    }

    let token_issuer =
        env::var("AUTH_TOKEN_ISSUER").unwrap_or_else(|_| "identity-service".to_string());

    let access_ttl_seconds = env::var("AUTH_ACCESS_TTL_SECONDS")
        .ok()
        .map(|value| parse_seconds(&value))
        .transpose()
        .context("Failed to parse AUTH_ACCESS_TTL_SECONDS")?
        .unwrap_or(900);

    let leeway_seconds = env::var("AUTH_LEEWAY_SECONDS")
        .ok()
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|err| anyhow!("Invalid leeway '{value}': {err}"))
        })
        .transpose()
        .context("Failed to parse AUTH_LEEWAY_SECONDS")?
        .unwrap_or(0);

    Ok(ServiceConfig {
        bind_host,
        bind_port,
        database_url,
        jwt_secret,
        token_issuer,
        access_ttl_seconds,
        leeway_seconds,
    })
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|err| anyhow!("Invalid port '{value}': {err}"))
}

fn parse_seconds(value: &str) -> Result<i64> {
    let seconds = value
        .trim()
        .parse::<i64>()
        .map_err(|err| anyhow!("Invalid duration '{value}': {err}"))?;
    if seconds <= 0 {
        return Err(anyhow!("Duration must be positive, got {seconds}"));
    }
    Ok(seconds)
}
