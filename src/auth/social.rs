//! Google OAuth: server-side authorization code flow
//!
//! `/auth/social/google/login` sends the browser to Google's consent screen;
//! the callback exchanges the code, upserts an account by email, and hands
//! the token pair back to the frontend via redirect query parameters.

use axum::extract::{Extension, Query};
use axum::response::Redirect;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::handlers::issue_tokens;
use super::security;
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// GET /auth/social/google/login
/// Redirects to Google's consent screen
pub async fn google_login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Redirect, ApiError> {
    let state = state_lock.read().await.clone();

    let oauth = state
        .google_oauth
        .as_ref()
        .ok_or_else(|| ApiError::InternalServer("Google login is not configured".to_string()))?;

    let params = [
        ("client_id", oauth.client_id.as_str()),
        ("redirect_uri", oauth.redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("access_type", "offline"),
        ("prompt", "consent"),
    ];

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(Redirect::to(&format!("{}?{}", GOOGLE_AUTH_URL, query)))
}

/// GET /auth/social/google/callback?code=...
/// Exchanges the authorization code, upserts the account, and redirects to
/// the frontend with the token pair in the query string
pub async fn google_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    let state = state_lock.read().await.clone();

    let oauth = state
        .google_oauth
        .as_ref()
        .ok_or_else(|| ApiError::InternalServer("Google login is not configured".to_string()))?;

    if let Some(oauth_error) = params.get("error") {
        warn!(oauth_error = %oauth_error, "Google OAuth returned error");
        return Err(ApiError::BadRequest("Authorization was denied".to_string()));
    }

    let code = params
        .get("code")
        .ok_or_else(|| ApiError::BadRequest("No authorization code provided".to_string()))?;

    // Exchange the code for Google tokens
    let token_response = state
        .http
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code.as_str()),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
            ("redirect_uri", oauth.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "HTTP error contacting Google token endpoint");
            ApiError::InternalServer("google token exchange unavailable".to_string())
        })?;

    if !token_response.status().is_success() {
        warn!(status = %token_response.status(), "Google code exchange rejected");
        return Err(ApiError::BadRequest("Failed to get tokens".to_string()));
    }

    let tokens: serde_json::Value = token_response
        .json()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed token response".to_string()))?;

    let google_access_token = tokens
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("No access token returned by Google".to_string()))?;

    // Fetch the user's profile
    let userinfo: serde_json::Value = state
        .http
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(google_access_token)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "HTTP error contacting Google userinfo endpoint");
            ApiError::InternalServer("google userinfo unavailable".to_string())
        })?
        .json()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed userinfo response".to_string()))?;

    let email = userinfo
        .get("email")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No email returned by Google".to_string()))?;

    // Find or create the account
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user_id = match existing {
        Some((id,)) => id,
        None => {
            let id = generate_user_id();
            // Social accounts get an unguessable placeholder password so the
            // password login path can never match
            let placeholder = security::hash_password(&security::generate_refresh_token())?;

            sqlx::query(
                "INSERT INTO users (id, email, hashed_password, credits) VALUES (?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&email)
            .bind(&placeholder)
            .bind(state.signup_credits)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            info!(
                user_id = %id,
                email = %safe_email_log(&email),
                "New account created via Google OAuth"
            );

            id
        }
    };

    let tokens = issue_tokens(&state, &user_id, &email).await?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&email),
        "User authentication successful via Google OAuth"
    );

    let redirect = format!(
        "{}?access_token={}&refresh_token={}&provider=google",
        state.frontend_callback_url,
        urlencoding::encode(&tokens.access_token),
        urlencoding::encode(&tokens.refresh_token),
    );

    Ok(Redirect::to(&redirect))
}
