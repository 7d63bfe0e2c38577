//! Paystack transaction API client and webhook payloads.

use async_trait::async_trait;
use leasehold_core::payment::{from_minor_units, lease_id_from_reference};
use leasehold_core::types::DbId;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PROVIDER_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// Transaction status reported for a completed charge.
const STATUS_SUCCESS: &str = "success";

/// Webhook event type for a completed charge.
pub const EVENT_CHARGE_SUCCESS: &str = "charge.success";

/// Errors from the payment gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status or `status: false`.
    #[error("Payment gateway error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The gateway answered with a body we could not decode.
    #[error("Unexpected payment gateway response: {0}")]
    Decode(String),

    /// The client was built with an unusable base URL.
    #[error("Invalid payment gateway configuration: {0}")]
    Config(String),
}

/// Body of `POST /transaction/initialize`. `amount` is in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeRequest {
    pub email: String,
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    pub callback_url: String,
    pub metadata: Value,
}

/// Hosted checkout session returned by initialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// A transaction as reported by verify and by `charge.success` webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub status: String,
    pub reference: String,
    /// Amount in minor units.
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
    /// Arbitrary metadata echoed back from initialize. Paystack sends an
    /// empty string when none was set.
    #[serde(default)]
    pub metadata: Value,
}

impl Transaction {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Amount in major currency units.
    pub fn amount_major(&self) -> f64 {
        from_minor_units(self.amount)
    }

    /// Lease id from `metadata.lease_id` (or `leaseId`), falling back to a
    /// reference generated by this service.
    pub fn lease_id(&self) -> Option<DbId> {
        ["lease_id", "leaseId"]
            .iter()
            .find_map(|key| self.metadata.get(key).and_then(value_as_id))
            .or_else(|| lease_id_from_reference(&self.reference))
    }
}

/// Accept ids sent as JSON numbers or numeric strings.
fn value_as_id(value: &Value) -> Option<DbId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A decoded payment webhook.
#[derive(Debug, Clone)]
pub enum PaystackEvent {
    ChargeSuccess(Transaction),
    /// Any other event type; acknowledged and ignored.
    Other(String),
}

#[derive(Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

impl PaystackEvent {
    /// Decode a raw webhook body. Call only after the signature has been verified.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawEvent = serde_json::from_slice(body)?;
        if raw.event == EVENT_CHARGE_SUCCESS {
            Ok(PaystackEvent::ChargeSuccess(serde_json::from_value(raw.data)?))
        } else {
            Ok(PaystackEvent::Other(raw.event))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PaystackEvent::ChargeSuccess(_) => EVENT_CHARGE_SUCCESS,
            PaystackEvent::Other(name) => name,
        }
    }
}

/// Operations the settlement flow needs from a payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session.
    async fn initialize(&self, request: &InitializeRequest) -> Result<PaymentSession, GatewayError>;

    /// Look up the current state of a transaction by reference.
    async fn verify(&self, reference: &str) -> Result<Transaction, GatewayError>;
}

/// Standard Paystack response envelope.
#[derive(Deserialize)]
struct Envelope {
    status: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

/// HTTP client for the Paystack transaction API.
pub struct PaystackClient {
    client: reqwest::Client,
    base_url: Url,
    secret_key: String,
}

impl std::fmt::Debug for PaystackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaystackClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PaystackClient {
    /// Create a client for `base_url` (normally [`DEFAULT_BASE_URL`]).
    pub fn new(base_url: &str, secret_key: String) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url).map_err(|e| GatewayError::Config(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!("{base_url} cannot be a base URL")));
        }
        let client = reqwest::Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            secret_key,
        })
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|_| GatewayError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        })?;

        if !status.is_success() || !envelope.status {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: envelope.message,
            });
        }

        serde_json::from_value(envelope.data).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize(&self, request: &InitializeRequest) -> Result<PaymentSession, GatewayError> {
        tracing::debug!(reference = %request.reference, amount = request.amount, "Initializing payment");
        let response = self
            .client
            .post(self.endpoint(&["transaction", "initialize"]))
            .bearer_auth(&self.secret_key)
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn verify(&self, reference: &str) -> Result<Transaction, GatewayError> {
        tracing::debug!(%reference, "Verifying payment");
        let response = self
            .client
            .get(self.endpoint(&["transaction", "verify", reference]))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn transaction(metadata: Value, reference: &str) -> Transaction {
        Transaction {
            status: "success".into(),
            reference: reference.into(),
            amount: 120_000,
            currency: Some("GHS".into()),
            paid_at: None,
            metadata,
        }
    }

    #[test]
    fn lease_id_from_metadata_in_either_spelling() {
        assert_eq!(transaction(json!({"lease_id": 7}), "x").lease_id(), Some(7));
        assert_eq!(transaction(json!({"leaseId": "8"}), "x").lease_id(), Some(8));
    }

    #[test]
    fn lease_id_falls_back_to_generated_reference() {
        assert_eq!(transaction(json!(""), "LEASE_9_1700000000000").lease_id(), Some(9));
        assert_eq!(transaction(Value::Null, "T123").lease_id(), None);
    }

    #[test]
    fn amount_is_converted_to_major_units() {
        assert_eq!(transaction(Value::Null, "x").amount_major(), 1200.0);
    }

    #[test]
    fn decodes_charge_success_event() {
        let body = json!({
            "event": "charge.success",
            "data": {
                "status": "success",
                "reference": "LEASE_1_1",
                "amount": 50_000,
                "metadata": {"lease_id": 1}
            }
        });
        let event = PaystackEvent::from_json(&serde_json::to_vec(&body).unwrap()).unwrap();
        let tx = assert_matches!(event, PaystackEvent::ChargeSuccess(tx) => tx);
        assert!(tx.is_success());
        assert_eq!(tx.lease_id(), Some(1));
    }

    #[test]
    fn other_events_are_passed_through_by_name() {
        let event = PaystackEvent::from_json(br#"{"event":"transfer.success","data":{}}"#).unwrap();
        assert_eq!(event.name(), "transfer.success");
        assert_matches!(event, PaystackEvent::Other(_));
    }

    #[test]
    fn malformed_charge_payload_is_an_error() {
        assert!(PaystackEvent::from_json(br#"{"event":"charge.success","data":{}}"#).is_err());
        assert!(PaystackEvent::from_json(b"[]").is_err());
    }

    #[test]
    fn endpoint_encodes_reference() {
        let client = PaystackClient::new("https://api.paystack.co/", "sk".into()).unwrap();
        let url = client.endpoint(&["transaction", "verify", "a b/c"]);
        assert_eq!(url.as_str(), "https://api.paystack.co/transaction/verify/a%20b%2Fc");
    }

    #[test]
    fn rejects_relative_base_url() {
        assert_matches!(
            PaystackClient::new("not a url", "sk".into()),
            Err(GatewayError::Config(_))
        );
    }

    #[test]
    fn debug_output_omits_secret_key() {
        let client = PaystackClient::new("https://api.paystack.co/", "sk_live_hidden".into()).unwrap();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("api.paystack.co"));
        assert!(!rendered.contains("sk_live_hidden"));
    }
}
