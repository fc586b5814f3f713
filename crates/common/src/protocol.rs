//! Request and response types exchanged over the public HTTP API.
//!
//! No type in this module ever carries an encrypted envelope or an unmasked
//! identity number on the response side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Vehicle records
// ---------------------------------------------------------------------------

/// Registration status of a vehicle record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Active,
    Expired,
    Revoked,
}

/// Request body for `POST /api/vehicles`.
///
/// `owner_aadhaar` and `driver_aadhaar` are the plaintext 12-digit identity
/// numbers; they are encrypted before the record is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_aadhaar: String,
    pub owner_mobile: Option<String>,
    pub chassis_number: Option<String>,
    pub registration_date: Option<String>,
    pub driver_name: Option<String>,
    pub driver_aadhaar: Option<String>,
    pub driver_mobile: Option<String>,
    pub driving_license_number: Option<String>,
    pub status: Option<VehicleStatus>,
}

/// Request body for `PUT /api/vehicles/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVehicleRequest {
    pub registration_number: Option<String>,
    pub owner_name: Option<String>,
    pub owner_aadhaar: Option<String>,
    pub owner_mobile: Option<String>,
    pub chassis_number: Option<String>,
    pub registration_date: Option<String>,
    pub driver_name: Option<String>,
    pub driver_aadhaar: Option<String>,
    pub driver_mobile: Option<String>,
    pub driving_license_number: Option<String>,
    pub status: Option<VehicleStatus>,
}

/// Display-safe projection of a stored vehicle record.
///
/// Identity numbers only appear in their masked `XXXX-XXXX-1234` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: Uuid,
    pub registration_number: String,
    pub owner_name: String,
    pub owner_aadhaar_masked: String,
    pub owner_mobile: Option<String>,
    pub chassis_number: Option<String>,
    pub registration_date: Option<String>,
    pub driver_name: Option<String>,
    pub driver_aadhaar_masked: String,
    pub driver_mobile: Option<String>,
    pub driving_license_number: Option<String>,
    pub status: VehicleStatus,
}

/// Admin response for create, fetch and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleResponse {
    pub data: VehicleView,
    /// Public verification link encoded into the vehicle's QR code.
    pub verify_url: String,
}

/// Public response for `GET /api/verify/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub data: VehicleView,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.public_message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of vehicle records currently stored.
    pub records: usize,
}
