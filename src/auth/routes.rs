//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, social};

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth/signup` - Password signup
/// - `POST /auth/login` - Password login
/// - `POST /auth/refresh` - Refresh-token rotation
/// - `GET /auth/social/google/login` - Start Google OAuth flow
/// - `GET /auth/social/google/callback` - Google OAuth callback
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/social/google/login", get(social::google_login))
        .route("/auth/social/google/callback", get(social::google_callback))
}
