//! Common types, protocol definitions, and errors shared across `vehicle-registry` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
