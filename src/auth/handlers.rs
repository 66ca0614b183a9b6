//! Authentication handlers: signup, login, refresh

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{LoginRequest, RefreshRequest, SignupRequest, TokenResponse};
use super::security;
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState, Validator};

/// POST /auth/signup
/// Registers an account, grants the starting credits, and returns a token pair
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let state = state_lock.read().await.clone();

    let validation = payload.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let email = payload.email.trim().to_lowercase();

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let user_id = generate_user_id();
    let hashed_password = security::hash_password(&payload.password)?;

    sqlx::query(
        "INSERT INTO users (id, email, hashed_password, credits) VALUES (?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&email)
    .bind(&hashed_password)
    .bind(state.signup_credits)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&email),
        credits = state.signup_credits,
        "New account created"
    );

    let tokens = issue_tokens(&state, &user_id, &email).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /auth/login
/// Verifies the password and returns a fresh token pair
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let email = payload.email.trim().to_lowercase();

    let user: Option<(String, String)> =
        sqlx::query_as("SELECT id, hashed_password FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    let (user_id, hashed_password) = match user {
        Some(row) => row,
        None => {
            warn!(email = %safe_email_log(&email), "Login failed: unknown email");
            return Err(ApiError::BadRequest("Invalid email or password".to_string()));
        }
    };

    if !security::verify_password(&payload.password, &hashed_password) {
        warn!(email = %safe_email_log(&email), "Login failed: wrong password");
        return Err(ApiError::BadRequest("Invalid email or password".to_string()));
    }

    info!(user_id = %user_id, email = %safe_email_log(&email), "Login successful");

    let tokens = issue_tokens(&state, &user_id, &email).await?;
    Ok(Json(tokens))
}

/// POST /auth/refresh
/// Exchanges a refresh token for a new token pair
///
/// Refresh tokens are stored only as salted hashes, so the lookup scans the
/// accounts that hold one and verifies each candidate.
pub async fn refresh(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    if payload.refresh_token.is_empty() {
        return Err(ApiError::BadRequest("Missing refresh token".to_string()));
    }

    let candidates: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT id, email, refresh_token_hash FROM users WHERE refresh_token_hash IS NOT NULL",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    for (user_id, email, stored_hash) in candidates {
        if security::verify_password(&payload.refresh_token, &stored_hash) {
            info!(user_id = %user_id, "Refresh token accepted, rotating");
            let tokens = issue_tokens(&state, &user_id, &email).await?;
            return Ok(Json(tokens));
        }
    }

    warn!("Refresh failed: token matched no stored hash");
    Err(ApiError::Unauthorized("Invalid refresh token".to_string()))
}

/// Issue an access/refresh pair and persist the rotated refresh hash
pub(super) async fn issue_tokens(
    state: &AppState,
    user_id: &str,
    email: &str,
) -> Result<TokenResponse, ApiError> {
    let access_token = security::create_access_token(
        email,
        &state.jwt_secret,
        state.access_token_expire_minutes,
    )?;

    let refresh_token = security::generate_refresh_token();
    let refresh_hash = security::hash_password(&refresh_token)?;

    sqlx::query("UPDATE users SET refresh_token_hash = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(&refresh_hash)
        .bind(user_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(TokenResponse::new(access_token, refresh_token))
}
