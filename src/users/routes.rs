//! User account routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the users router
///
/// # Routes
/// - `GET /users/me` - Current account summary
pub fn users_routes() -> Router {
    Router::new().route("/users/me", get(handlers::me))
}
