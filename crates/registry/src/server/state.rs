//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use uuid::Uuid;

use crate::crypto::FieldCipher;
use crate::records::VehicleStore;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Identity-number cipher bound to the process-wide key material.
    pub cipher: FieldCipher,
    /// Vehicle record persistence.
    pub store: Arc<dyn VehicleStore>,
    /// Base URL of the public verification page, without a trailing slash.
    pub public_app_url: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(cipher: FieldCipher, store: Arc<dyn VehicleStore>, public_app_url: String) -> Self {
        Self {
            cipher,
            store,
            public_app_url: Arc::new(public_app_url),
        }
    }

    /// Public verification link for a vehicle, as encoded into its QR code.
    pub fn verify_url(&self, id: &Uuid) -> String {
        format!("{}/verify/{id}", self.public_app_url)
    }
}

#[cfg(test)]
impl AppState {
    /// State with a fixed test key and the given store.
    pub fn for_tests(store: Arc<dyn VehicleStore>) -> Self {
        use crate::crypto::EncryptionSecret;

        let cipher = FieldCipher::new(&EncryptionSecret::new("registry-test-secret"))
            .expect("test secret is non-empty");
        Self::new(cipher, store, "http://localhost:5173".into())
    }
}
