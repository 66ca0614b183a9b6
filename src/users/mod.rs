//! # Users Module
//!
//! Account self-service endpoints.

pub mod handlers;
pub mod routes;

pub use routes::users_routes;
