//! Utility routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the utils router
///
/// # Routes
/// - `GET /utils/ipinfo` - IP geolocation proxy (no auth)
pub fn utils_routes() -> Router {
    Router::new().route("/utils/ipinfo", get(handlers::ipinfo))
}
