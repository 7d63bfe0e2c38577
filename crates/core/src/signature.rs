//! Webhook signature verification.
//!
//! Two schemes are supported:
//!
//! - **Payment gateway**: hex-encoded HMAC-SHA512 of the raw request body,
//!   keyed with the gateway secret key, sent in a single header.
//! - **Identity provider (Svix)**: base64 HMAC-SHA256 over
//!   `"{msg_id}.{timestamp}.{body}"`, keyed with the base64 payload of a
//!   `whsec_` secret. The signature header may carry several space-separated
//!   `v1,<sig>` entries (key rotation); any match is accepted.
//!
//! All comparisons are constant-time. Failures map to
//! [`CoreError::Unauthorized`]; a malformed configured secret maps to
//! [`CoreError::Internal`] since it is a deployment fault, not a client one.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::error::CoreError;
use crate::types::Timestamp;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Maximum clock skew accepted for Svix timestamps, in seconds.
pub const SVIX_TOLERANCE_SECS: i64 = 5 * 60;

/// Prefix of Svix signing secrets.
const SVIX_SECRET_PREFIX: &str = "whsec_";

/// Version tag of the only Svix signature scheme we understand.
const SVIX_SIGNATURE_VERSION: &str = "v1";

// ---------------------------------------------------------------------------
// Payment gateway (HMAC-SHA512, hex)
// ---------------------------------------------------------------------------

/// Compute the hex HMAC-SHA512 signature of `body`.
pub fn sign_payment_webhook(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a payment-gateway webhook signature header against the raw body.
pub fn verify_payment_webhook(
    secret: &str,
    body: &[u8],
    signature_hex: &str,
) -> Result<(), CoreError> {
    let provided = hex::decode(signature_hex.trim())
        .map_err(|_| CoreError::Unauthorized("Malformed webhook signature".into()))?;

    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| CoreError::Unauthorized("Invalid webhook signature".into()))
}

// ---------------------------------------------------------------------------
// Identity provider (Svix, HMAC-SHA256, base64)
// ---------------------------------------------------------------------------

/// The three Svix delivery headers.
#[derive(Debug, Clone)]
pub struct SvixHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

fn svix_key(secret: &str) -> Result<Vec<u8>, CoreError> {
    let encoded = secret.strip_prefix(SVIX_SECRET_PREFIX).unwrap_or(secret);
    STANDARD
        .decode(encoded)
        .map_err(|_| CoreError::Internal("Identity webhook secret is not valid base64".into()))
}

fn svix_mac(key: &[u8], id: &str, timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    mac.finalize().into_bytes().to_vec()
}

/// Produce a `v1,<base64>` signature header value.
pub fn sign_svix(secret: &str, id: &str, timestamp: &str, body: &[u8]) -> Result<String, CoreError> {
    let key = svix_key(secret)?;
    let sig = svix_mac(&key, id, timestamp, body);
    Ok(format!("{SVIX_SIGNATURE_VERSION},{}", STANDARD.encode(sig)))
}

/// Verify a Svix-signed delivery received at `now`.
pub fn verify_svix(
    secret: &str,
    headers: &SvixHeaders<'_>,
    body: &[u8],
    now: Timestamp,
) -> Result<(), CoreError> {
    let key = svix_key(secret)?;

    let sent_at: i64 = headers
        .timestamp
        .trim()
        .parse()
        .map_err(|_| CoreError::Unauthorized("Malformed webhook timestamp".into()))?;
    if now.timestamp().abs_diff(sent_at) > SVIX_TOLERANCE_SECS.unsigned_abs() {
        return Err(CoreError::Unauthorized(
            "Webhook timestamp outside tolerance".into(),
        ));
    }

    let expected = svix_mac(&key, headers.id, headers.timestamp.trim(), body);

    let matched = headers
        .signature
        .split_whitespace()
        .filter_map(|entry| entry.split_once(','))
        .filter(|(version, _)| *version == SVIX_SIGNATURE_VERSION)
        .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
        .any(|candidate| bool::from(candidate.ct_eq(&expected)));

    if matched {
        Ok(())
    } else {
        Err(CoreError::Unauthorized("Invalid webhook signature".into()))
    }
}
