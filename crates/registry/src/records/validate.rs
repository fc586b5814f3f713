//! Field validation for create and update requests.
//!
//! An omitted optional field is skipped. A supplied one is always checked, so
//! an empty identity number, mobile or date is rejected rather than ignored.

use chrono::NaiveDate;
use common::protocol::{CreateVehicleRequest, UpdateVehicleRequest};
use thiserror::Error;

const MAX_REGISTRATION_LEN: usize = 20;
const MAX_NAME_LEN: usize = 100;
const MAX_CHASSIS_LEN: usize = 50;
const MAX_LICENSE_LEN: usize = 20;
const IDENTITY_NUMBER_LEN: usize = 12;
const MOBILE_LEN: usize = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The first field that failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} must be exactly 12 digits")]
    InvalidIdentityNumber(&'static str),

    #[error("{0} is not a valid mobile number")]
    InvalidMobile(&'static str),

    #[error("{0} must be a calendar date (YYYY-MM-DD)")]
    InvalidDate(&'static str),
}

/// Validate a create request.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, checking fields in
/// request order.
pub fn validate_create(req: &CreateVehicleRequest) -> Result<(), ValidationError> {
    required("registration_number", &req.registration_number)?;
    max_len("registration_number", &req.registration_number, MAX_REGISTRATION_LEN)?;
    required("owner_name", &req.owner_name)?;
    max_len("owner_name", &req.owner_name, MAX_NAME_LEN)?;
    required("owner_aadhaar", &req.owner_aadhaar)?;
    identity_number("owner_aadhaar", &req.owner_aadhaar)?;
    optional_fields(
        req.owner_mobile.as_deref(),
        req.chassis_number.as_deref(),
        req.registration_date.as_deref(),
        req.driver_name.as_deref(),
        req.driver_aadhaar.as_deref(),
        req.driver_mobile.as_deref(),
        req.driving_license_number.as_deref(),
    )
}

/// Validate an update request. Only supplied fields are checked.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_update(req: &UpdateVehicleRequest) -> Result<(), ValidationError> {
    if let Some(reg) = &req.registration_number {
        max_len("registration_number", reg, MAX_REGISTRATION_LEN)?;
    }
    if let Some(name) = &req.owner_name {
        max_len("owner_name", name, MAX_NAME_LEN)?;
    }
    if let Some(aadhaar) = &req.owner_aadhaar {
        identity_number("owner_aadhaar", aadhaar)?;
    }
    optional_fields(
        req.owner_mobile.as_deref(),
        req.chassis_number.as_deref(),
        req.registration_date.as_deref(),
        req.driver_name.as_deref(),
        req.driver_aadhaar.as_deref(),
        req.driver_mobile.as_deref(),
        req.driving_license_number.as_deref(),
    )
}

fn optional_fields(
    owner_mobile: Option<&str>,
    chassis_number: Option<&str>,
    registration_date: Option<&str>,
    driver_name: Option<&str>,
    driver_aadhaar: Option<&str>,
    driver_mobile: Option<&str>,
    driving_license_number: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(m) = owner_mobile {
        mobile("owner_mobile", m)?;
    }
    if let Some(c) = chassis_number {
        max_len("chassis_number", c, MAX_CHASSIS_LEN)?;
    }
    if let Some(d) = registration_date {
        date("registration_date", d)?;
    }
    if let Some(n) = driver_name {
        max_len("driver_name", n, MAX_NAME_LEN)?;
    }
    if let Some(a) = driver_aadhaar {
        identity_number("driver_aadhaar", a)?;
    }
    if let Some(m) = driver_mobile {
        mobile("driver_mobile", m)?;
    }
    if let Some(l) = driving_license_number {
        max_len("driving_license_number", l, MAX_LICENSE_LEN)?;
    }
    Ok(())
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn identity_number(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() != IDENTITY_NUMBER_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidIdentityNumber(field));
    }
    Ok(())
}

/// Indian mobile numbers: ten digits, the first in `6..=9`.
fn mobile(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == MOBILE_LEN
        && value.bytes().all(|b| b.is_ascii_digit())
        && matches!(value.as_bytes()[0], b'6'..=b'9');
    if !valid {
        return Err(ValidationError::InvalidMobile(field));
    }
    Ok(())
}

fn date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(field))
}
