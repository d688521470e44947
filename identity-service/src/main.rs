use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use common_auth::{JwtConfig, TokenVerifier};
use identity_service::config::load_service_config;
use identity_service::metrics::AuthMetrics;
use identity_service::store::PgAccountStore;
use identity_service::tokens::{TokenConfig, TokenSigner};
use identity_service::{app, AppState};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_service_config()?;

    let pool = PgPool::connect(&config.database_url).await?;
    let store = Arc::new(PgAccountStore::new(pool));

    let verifier = TokenVerifier::new(
        config.secret_bytes(),
        JwtConfig::new(&config.token_issuer).with_leeway(config.leeway_seconds),
    );
    let signer = TokenSigner::new(
        config.secret_bytes(),
        TokenConfig {
            issuer: config.token_issuer.clone(),
            access_ttl_seconds: config.access_ttl_seconds,
        },
    );

    let state = AppState {
        store,
        verifier: Arc::new(verifier),
        signer: Arc::new(signer),
        metrics: Arc::new(AuthMetrics::new()?),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION]);

    let app = app::router(state).layer(cors);

    let ip: std::net::IpAddr = config.bind_host.parse()?;
    let addr = SocketAddr::from((ip, config.bind_port));

    println!("starting identity-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
