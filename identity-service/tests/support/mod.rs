use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common_auth::{JwtConfig, TokenVerifier};
use http_body_util::BodyExt;
use identity_service::app;
use identity_service::metrics::AuthMetrics;
use identity_service::password;
use identity_service::store::{Account, AccountStore, MemoryAccountStore, NewAccount};
use identity_service::tokens::{TokenConfig, TokenSigner};
use identity_service::AppState;
use serde_json::Value;
use tower::util::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";
pub const TEST_ISSUER: &str = "identity-service";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryAccountStore>,
}

pub fn build_app() -> TestApp {
    let store = Arc::new(MemoryAccountStore::new());
    let verifier = TokenVerifier::new(TEST_SECRET, JwtConfig::new(TEST_ISSUER));
    let signer = TokenSigner::new(
        TEST_SECRET,
        TokenConfig {
            issuer: TEST_ISSUER.to_string(),
            access_ttl_seconds: 900,
        },
    );

    let state = AppState {
        store: store.clone(),
        verifier: Arc::new(verifier),
        signer: Arc::new(signer),
        metrics: Arc::new(AuthMetrics::new().expect("metrics")),
    };

    TestApp {
        app: app::router(state),
        store,
    }
}

/// Signer whose tokens are already past their expiry.
#[allow(dead_code)]
pub fn expired_signer() -> TokenSigner {
    TokenSigner::new(
        TEST_SECRET,
        TokenConfig {
            issuer: TEST_ISSUER.to_string(),
            access_ttl_seconds: -600,
        },
    )
}

/// Signer using a secret the app's verifier does not know.
#[allow(dead_code)]
pub fn foreign_signer() -> TokenSigner {
    TokenSigner::new(
        b"some-other-secret",
        TokenConfig {
            issuer: TEST_ISSUER.to_string(),
            access_ttl_seconds: 900,
        },
    )
}

#[allow(dead_code)]
pub async fn seed_account(
    store: &MemoryAccountStore,
    username: &str,
    nickname: &str,
    password_plain: &str,
    is_admin: bool,
) -> Account {
    let password_hash = password::hash_password(password_plain).expect("hash");
    let account = store
        .insert(NewAccount {
            username: username.to_string(),
            nickname: nickname.to_string(),
            password_hash,
        })
        .await
        .expect("seed insert");

    if is_admin {
        store
            .set_admin(account.id)
            .await
            .expect("set_admin")
            .expect("seeded account exists")
    } else {
        account
    }
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

#[allow(dead_code)]
pub async fn get_with_token(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request_with_token(app, "GET", uri, token).await
}

#[allow(dead_code)]
pub async fn patch_with_token(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request_with_token(app, "PATCH", uri, token).await
}

async fn request_with_token(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).expect("request");
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

#[allow(dead_code)]
pub async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = post_json(
        app,
        "/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login should succeed: {body}");
    body["token"].as_str().expect("token").to_string()
}
