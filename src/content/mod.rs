//! # Content Module
//!
//! The credit-gated auto-publish workflow: generate an article (and
//! optionally an image), publish it to a connected WordPress site, then
//! settle the credit debit and audit record in one transaction.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use routes::content_routes;
