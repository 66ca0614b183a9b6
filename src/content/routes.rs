//! Content routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the content router
///
/// # Routes
/// - `POST /content/auto-publish` - Credit-gated generate-and-publish
pub fn content_routes() -> Router {
    Router::new().route("/content/auto-publish", post(handlers::auto_publish))
}
