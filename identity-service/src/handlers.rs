use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::{ensure_capability, AuthContext, Capability};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::password;
use crate::store::{NewAccount, StoreError};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public projection of an account: no id, no hash, no role flag.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn require_field(value: &str, name: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    require_field(&request.username, "username")?;
    require_field(&request.password, "password")?;
    require_field(&request.nickname, "nickname")?;

    // Optimistic fast path: a cheap read spares us the hashing work for the
    // common duplicate case. The insert below is the authoritative guard.
    if state
        .store
        .find_by_username(&request.username)
        .await?
        .is_some()
    {
        state.metrics.signup_attempt("duplicate");
        return Err(ApiError::UserAlreadyExists(
            "an account with this username already exists",
        ));
    }

    let password_hash = password::hash_password(&request.password)?;

    let inserted = state
        .store
        .insert(NewAccount {
            username: request.username,
            nickname: request.nickname,
            password_hash,
        })
        .await;

    match inserted {
        Ok(account) => {
            state.metrics.signup_attempt("success");
            info!(account_id = %account.id, username = %account.username, "account created");
            Ok((
                StatusCode::CREATED,
                Json(ProfileResponse {
                    username: account.username,
                    nickname: account.nickname,
                }),
            ))
        }
        // A second caller won the race between the check and the insert, or
        // the nickname collided even though the username did not. Either
        // way the store's constraint is the source of truth.
        Err(err) => {
            if matches!(err, StoreError::Duplicate) {
                state.metrics.signup_attempt("duplicate");
            }
            Err(err.into())
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let account = match state.store.find_by_username(&request.username).await? {
        Some(account) => account,
        None => {
            // Unknown username and wrong password must be indistinguishable,
            // in response body and in timing.
            password::dummy_verification(&request.password);
            state.metrics.login_attempt("failure");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !password::verify_password(&request.password, &account.password_hash) {
        state.metrics.login_attempt("failure");
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state.signer.issue(&account)?;
    state.metrics.login_attempt("success");
    info!(account_id = %account.id, "issued access token");

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ProfileResponse>, ApiError> {
    ensure_capability(&auth.claims, Capability::Authenticated)?;

    let account = state
        .store
        .get_by_id(auth.claims.subject)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ProfileResponse {
        username: account.username,
        nickname: account.nickname,
    }))
}

pub async fn grant_admin(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    ensure_capability(&auth.claims, Capability::Admin)?;

    let updated = state
        .store
        .set_admin(user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(actor = %auth.claims.subject, target = %updated.id, "granted admin role");

    Ok(Json(ProfileResponse {
        username: updated.username,
        nickname: updated.nickname,
    }))
}
