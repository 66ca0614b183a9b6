//! Publish record routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the posts router
///
/// # Routes
/// - `GET /posts/` - List the account's publish records
pub fn posts_routes() -> Router {
    Router::new().route("/posts/", get(handlers::list_posts))
}
