//! Payment amounts, settlement references, and validation.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Minor units per major unit (pesewas per cedi, kobo per naira, cents ...).
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Default ISO 4217 currency for gateway sessions.
pub const DEFAULT_CURRENCY: &str = "GHS";

/// Prefix of references generated for lease payments.
pub const REFERENCE_PREFIX: &str = "LEASE";

/// Convert a major-unit amount to integer minor units, rounding half away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * MINOR_UNITS_PER_MAJOR).round() as i64
}

/// Convert provider minor units back to a major-unit amount.
pub fn from_minor_units(minor: i64) -> f64 {
    minor as f64 / MINOR_UNITS_PER_MAJOR
}

/// Reject zero, negative, and non-finite payment amounts.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be a positive number".to_string(),
        ));
    }
    if to_minor_units(amount) == 0 {
        return Err(CoreError::Validation(
            "amount is smaller than the currency's minor unit".to_string(),
        ));
    }
    Ok(())
}

/// Build a settlement reference for a lease payment: `LEASE_{lease_id}_{unix_millis}`.
pub fn generate_reference(lease_id: DbId, now: Timestamp) -> String {
    format!("{REFERENCE_PREFIX}_{lease_id}_{}", now.timestamp_millis())
}

/// Recover the lease id embedded in a reference produced by [`generate_reference`].
pub fn lease_id_from_reference(reference: &str) -> Option<DbId> {
    let mut parts = reference.splitn(3, '_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(REFERENCE_PREFIX), Some(id), Some(_)) => id.parse().ok(),
        _ => None,
    }
}
