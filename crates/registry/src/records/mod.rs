//! Vehicle record lifecycle around the identity-number cipher.
//!
//! # Responsibilities
//!
//! - Normalise incoming request fields and encrypt identity numbers before a
//!   record reaches the store ([`protect`], [`prepare_update`]).
//! - Project stored records into display-safe views by decrypting and masking
//!   identity numbers ([`view`]).
//!
//! # Module invariants
//!
//! - A [`VehicleRecord`] never holds a plaintext identity number.
//! - A [`VehicleView`] never holds an envelope or an unmasked identity number.

pub mod store;
pub mod validate;

pub use store::{MemoryStore, StoreError, VehicleStore};
pub use validate::{validate_create, validate_update, ValidationError};

use common::protocol::{CreateVehicleRequest, UpdateVehicleRequest, VehicleStatus, VehicleView};
use uuid::Uuid;

use crate::crypto::{mask_identity_number, FieldCipher};

/// Stored form of a vehicle record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    pub id: Uuid,
    pub registration_number: String,
    pub owner_name: String,
    /// Envelope produced by [`FieldCipher::encrypt`].
    pub owner_aadhaar_encrypted: Option<String>,
    pub owner_mobile: Option<String>,
    pub chassis_number: Option<String>,
    pub registration_date: Option<String>,
    pub driver_name: Option<String>,
    /// Envelope produced by [`FieldCipher::encrypt`].
    pub driver_aadhaar_encrypted: Option<String>,
    pub driver_mobile: Option<String>,
    pub driving_license_number: Option<String>,
    pub status: VehicleStatus,
}

/// Build a new record from a validated create request, encrypting both
/// identity numbers.
pub fn protect(req: CreateVehicleRequest, cipher: &FieldCipher) -> VehicleRecord {
    VehicleRecord {
        id: Uuid::new_v4(),
        registration_number: req.registration_number.trim().to_uppercase(),
        owner_name: req.owner_name.trim().to_owned(),
        owner_aadhaar_encrypted: cipher.encrypt(Some(req.owner_aadhaar.as_str())),
        owner_mobile: text(req.owner_mobile),
        chassis_number: upper(req.chassis_number),
        registration_date: text(req.registration_date),
        driver_name: text(req.driver_name),
        driver_aadhaar_encrypted: cipher.encrypt(req.driver_aadhaar.as_deref()),
        driver_mobile: text(req.driver_mobile),
        driving_license_number: upper(req.driving_license_number),
        status: req.status.unwrap_or_default(),
    }
}

/// A partial change to a stored record.
///
/// Identity numbers are already encrypted, so a store can apply the patch
/// under its own lock without touching the cipher. Only `Some` fields are
/// written; `Some(None)` clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub registration_number: Option<String>,
    pub owner_name: Option<String>,
    pub owner_aadhaar_encrypted: Option<String>,
    pub owner_mobile: Option<String>,
    pub chassis_number: Option<Option<String>>,
    pub registration_date: Option<String>,
    pub driver_name: Option<Option<String>>,
    pub driver_aadhaar_encrypted: Option<String>,
    pub driver_mobile: Option<String>,
    pub driving_license_number: Option<Option<String>>,
    pub status: Option<VehicleStatus>,
}

impl RecordUpdate {
    /// Soft delete: mark the record revoked and leave everything else as is.
    pub fn revoke() -> Self {
        Self {
            status: Some(VehicleStatus::Revoked),
            ..Self::default()
        }
    }

    /// Write the supplied fields into `record`.
    pub fn apply_to(self, record: &mut VehicleRecord) {
        if let Some(reg) = self.registration_number {
            record.registration_number = reg;
        }
        if let Some(name) = self.owner_name {
            record.owner_name = name;
        }
        if let Some(envelope) = self.owner_aadhaar_encrypted {
            record.owner_aadhaar_encrypted = Some(envelope);
        }
        if let Some(mobile) = self.owner_mobile {
            record.owner_mobile = Some(mobile);
        }
        if let Some(chassis) = self.chassis_number {
            record.chassis_number = chassis;
        }
        if let Some(date) = self.registration_date {
            record.registration_date = Some(date);
        }
        if let Some(name) = self.driver_name {
            record.driver_name = name;
        }
        if let Some(envelope) = self.driver_aadhaar_encrypted {
            record.driver_aadhaar_encrypted = Some(envelope);
        }
        if let Some(mobile) = self.driver_mobile {
            record.driver_mobile = Some(mobile);
        }
        if let Some(licence) = self.driving_license_number {
            record.driving_license_number = licence;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

/// Turn a validated update request into a [`RecordUpdate`].
///
/// Identity numbers are encrypted only when supplied; an omitted one keeps
/// the stored envelope. A blank registration number or owner name is ignored.
pub fn prepare_update(req: UpdateVehicleRequest, cipher: &FieldCipher) -> RecordUpdate {
    RecordUpdate {
        registration_number: upper(req.registration_number),
        owner_name: text(req.owner_name),
        owner_aadhaar_encrypted: cipher.encrypt(req.owner_aadhaar.as_deref()),
        owner_mobile: text(req.owner_mobile),
        chassis_number: req.chassis_number.map(|c| upper(Some(c))),
        registration_date: text(req.registration_date),
        driver_name: req.driver_name.map(|n| text(Some(n))),
        driver_aadhaar_encrypted: cipher.encrypt(req.driver_aadhaar.as_deref()),
        driver_mobile: text(req.driver_mobile),
        driving_license_number: req.driving_license_number.map(|l| upper(Some(l))),
        status: req.status,
    }
}

/// Project a stored record into its display-safe view.
///
/// An identity number that cannot be decrypted is shown fully redacted, the
/// same as one that was never stored.
pub fn view(record: &VehicleRecord, cipher: &FieldCipher) -> VehicleView {
    let masked = |envelope: &Option<String>| {
        let plaintext = cipher.decrypt(envelope.as_deref());
        mask_identity_number(plaintext.as_deref())
    };

    VehicleView {
        id: record.id,
        registration_number: record.registration_number.clone(),
        owner_name: record.owner_name.clone(),
        owner_aadhaar_masked: masked(&record.owner_aadhaar_encrypted),
        owner_mobile: record.owner_mobile.clone(),
        chassis_number: record.chassis_number.clone(),
        registration_date: record.registration_date.clone(),
        driver_name: record.driver_name.clone(),
        driver_aadhaar_masked: masked(&record.driver_aadhaar_encrypted),
        driver_mobile: record.driver_mobile.clone(),
        driving_license_number: record.driving_license_number.clone(),
        status: record.status,
    }
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn upper(value: Option<String>) -> Option<String> {
    text(value).map(|v| v.to_uppercase())
}
