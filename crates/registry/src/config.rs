//! Configuration loading and validation for the registry service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::EncryptionSecret;

/// Validated registry service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Secret from which the field-encryption key is derived. **Required.**
    pub encryption_key: EncryptionSecret,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the public verification page encoded into QR codes.
    #[serde(default = "default_public_app_url")]
    pub public_app_url: String,

    /// OTLP endpoint for trace export. Traces stay local when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    5000
}
fn default_public_app_url() -> String {
    "http://localhost:5173".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is ENCRYPTION_KEY set?)")?;

        c.validate()?;
        Ok(c.normalised())
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.is_empty() {
            anyhow::bail!("ENCRYPTION_KEY is required and must not be empty");
        }
        ensure_non_empty(&self.public_app_url, "PUBLIC_APP_URL")?;
        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }

    fn normalised(mut self) -> Self {
        let trimmed = self.public_app_url.trim().trim_end_matches('/').to_owned();
        self.public_app_url = trimmed;
        self
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
