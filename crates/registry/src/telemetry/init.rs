//! Tracing subscriber initialisation with optional OTLP trace export.

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace::Tracer, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name reported as `service.name` on exported spans.
const SERVICE_NAME: &str = "vehicle-registry";

/// Initialise the global tracing subscriber.
///
/// Configures:
/// - An [`EnvFilter`] from `RUST_LOG`, falling back to `log_level`.
/// - A JSON-formatted [`tracing_subscriber`] layer for structured log output.
/// - When `otlp_endpoint` is set, a [`tracing_opentelemetry`] layer that
///   exports spans over OTLP/gRPC.
///
/// # Errors
///
/// Returns an error if the OTLP pipeline cannot be installed or a global
/// subscriber is already set.
pub fn init_telemetry(otlp_endpoint: Option<&str>, log_level: &str) -> Result<()> {
    let otel_layer = match otlp_endpoint {
        Some(endpoint) => Some(tracing_opentelemetry::layer().with_tracer(otlp_tracer(endpoint)?)),
        None => None,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .with(otel_layer)
        .try_init()
        .context("failed to initialise tracing subscriber")?;

    Ok(())
}

/// Flush and shut down the OTLP exporter, if one was installed.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}

fn otlp_tracer(endpoint: &str) -> Result<Tracer> {
    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default().with_resource(service_resource()),
        )
        .install_batch(runtime::Tokio)
        .context("failed to install OTLP tracing pipeline")
}

fn service_resource() -> Resource {
    Resource::new(vec![
        KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_NAME,
            SERVICE_NAME,
        ),
        KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
            env!("CARGO_PKG_VERSION"),
        ),
    ])
}
