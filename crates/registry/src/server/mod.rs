//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with the admin and public verification routes.
//! - Inject shared application state (`AppState`) into handlers.
//! - Map layer errors onto JSON error responses.
//!
//! Authentication of the admin routes is handled in front of this service.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
