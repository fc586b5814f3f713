//! Structured logging and optional OpenTelemetry trace export.
//!
//! # Telemetry invariants
//!
//! - **No identity number, envelope, or key material** may appear in any span
//!   attribute or log field. Decryption failures log the failure reason only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden
//!   by `RUST_LOG`.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
