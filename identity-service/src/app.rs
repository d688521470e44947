use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use common_auth::TokenVerifier;
use tracing::warn;

use crate::handlers::{grant_admin, login, profile, signup};
use crate::metrics::AuthMetrics;
use crate::store::AccountStore;
use crate::tokens::TokenSigner;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub verifier: Arc<TokenVerifier>,
    pub signer: Arc<TokenSigner>,
    pub metrics: Arc<AuthMetrics>,
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/admin/users/:user_id/roles", patch(grant_admin))
        .with_state(state)
}
