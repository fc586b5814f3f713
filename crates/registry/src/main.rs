//! `vehicle-registry`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise logging and optional OTLP trace export.
//! 3. Derive the field-encryption key and build the [`FieldCipher`].
//! 4. Build the Axum router over the record store and serve until a shutdown
//!    signal arrives.

mod config;
mod crypto;
mod records;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use config::Config;
use crypto::FieldCipher;
use records::MemoryStore;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        "vehicle-registry starting"
    );

    // -----------------------------------------------------------------------
    // 3. Key material
    // -----------------------------------------------------------------------
    let cipher = FieldCipher::new(&cfg.encryption_key)
        .context("failed to derive field-encryption key")?;

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(cipher, Arc::new(MemoryStore::new()), cfg.public_app_url.clone());
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("vehicle-registry stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
