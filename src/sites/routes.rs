//! Connected site routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the sites router
///
/// # Routes
/// - `GET /sites/` - List the account's connected sites
/// - `GET /sites/:id` - Single site detail
/// - `POST /sites/add` - Register a new site (runs the connectivity probe)
/// - `DELETE /sites/:id` - Remove a site
pub fn sites_routes() -> Router {
    Router::new()
        .route("/sites/", get(handlers::list_sites))
        .route("/sites/add", post(handlers::add_site))
        .route(
            "/sites/:id",
            get(handlers::get_site).delete(handlers::delete_site),
        )
}
