pub mod applications;
pub mod leases;
pub mod managers;
pub mod payments;
pub mod properties;
pub mod tenants;
pub mod webhooks;

use serde::{Deserialize, Deserializer};

/// Deserialize a string with surrounding whitespace removed.
///
/// Paired with `#[serde(default)]` a missing field becomes `""`, so
/// `#[validate(length(min = 1))]` reports it as a validation error.
pub(crate) fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

/// Like [`trimmed`] but blank values become `None`.
pub(crate) fn trimmed_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
