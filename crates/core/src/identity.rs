//! Identity-provider lifecycle events (`user.created`, `user.updated`,
//! `user.deleted`) and the profile fields mirrored into Tenant/Manager rows.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;

/// Name used when a newly created identity has no first or last name.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Role marker value in `public_metadata.userType` that designates a manager.
pub const ROLE_MANAGER: &str = "manager";

/// Outer webhook envelope: an event type plus an untyped payload.
#[derive(Debug, Deserialize)]
pub struct IdentityEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneNumber {
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicMetadata {
    #[serde(rename = "userType")]
    pub user_type: Option<String>,
}

/// User payload carried by `user.created` and `user.updated`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default)]
    pub public_metadata: PublicMetadata,
}

/// Payload carried by `user.deleted`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedIdentity {
    pub id: String,
}

/// Identity lifecycle event, validated at the webhook boundary.
#[derive(Debug, Clone)]
pub enum IdentityEvent {
    Created(IdentityUser),
    Updated(IdentityUser),
    Deleted(DeletedIdentity),
    /// Any other event type; acknowledged and ignored.
    Unhandled(String),
}

impl IdentityEvent {
    /// Decode a raw webhook body into a typed event.
    pub fn from_json(body: &[u8]) -> Result<Self, CoreError> {
        let envelope: IdentityEnvelope = serde_json::from_slice(body)
            .map_err(|e| CoreError::Validation(format!("Malformed identity event: {e}")))?;

        let IdentityEnvelope { kind, data } = envelope;
        let decode_err = |e: serde_json::Error| {
            CoreError::Validation(format!("Malformed {kind} payload: {e}"))
        };

        let event = match kind.as_str() {
            "user.created" => IdentityEvent::Created(serde_json::from_value(data).map_err(decode_err)?),
            "user.updated" => IdentityEvent::Updated(serde_json::from_value(data).map_err(decode_err)?),
            "user.deleted" => IdentityEvent::Deleted(serde_json::from_value(data).map_err(decode_err)?),
            _ => IdentityEvent::Unhandled(kind.clone()),
        };
        Ok(event)
    }

    /// Event type name as sent by the provider.
    pub fn kind(&self) -> &str {
        match self {
            IdentityEvent::Created(_) => "user.created",
            IdentityEvent::Updated(_) => "user.updated",
            IdentityEvent::Deleted(_) => "user.deleted",
            IdentityEvent::Unhandled(kind) => kind,
        }
    }
}

/// Profile fields extracted from an identity payload.
///
/// Empty strings are normalised to `None` so updates can skip them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub clerk_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_manager: bool,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl IdentityUser {
    /// Extract the mirrored profile: `first last`, first email, first phone, role.
    pub fn profile(&self) -> IdentityProfile {
        let full_name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        IdentityProfile {
            clerk_id: self.id.clone(),
            name: non_empty(&full_name),
            email: self
                .email_addresses
                .first()
                .and_then(|e| non_empty(&e.email_address)),
            phone_number: self
                .phone_numbers
                .first()
                .and_then(|p| non_empty(&p.phone_number)),
            is_manager: self
                .public_metadata
                .user_type
                .as_deref()
                .is_some_and(|role| role.eq_ignore_ascii_case(ROLE_MANAGER)),
        }
    }
}
