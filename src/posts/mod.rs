//! # Posts Module
//!
//! Read-side listing of publish records. Records are written exclusively
//! by the auto-publish workflow's settle stage and never mutated here.

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::posts_routes;
