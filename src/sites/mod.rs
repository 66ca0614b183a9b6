//! # Sites Module
//!
//! Connected WordPress sites: registration (with connectivity probe),
//! listing, and removal. Application passwords are stored encrypted and
//! never leave the service.

pub mod handlers;
pub mod models;
pub mod probe;
pub mod routes;

#[cfg(test)]
mod tests;

pub use models::Site;
pub use routes::sites_routes;
