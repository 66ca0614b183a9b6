//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Password signup and login
//! - Refresh-token rotation
//! - Google OAuth (server-side authorization code flow)
//! - JWT token generation and validation
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;
pub mod social;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::User;
pub use routes::auth_routes;
