//! # Utils Module
//!
//! Unauthenticated utility endpoints.

pub mod handlers;
pub mod routes;

pub use routes::utils_routes;
