//! Handlers for the `/payments` resource: checkout, verification and the
//! gateway's push webhook.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use leasehold_core::error::CoreError;
use leasehold_core::payment::{generate_reference, to_minor_units, validate_amount};
use leasehold_core::signature::verify_payment_webhook;
use leasehold_core::types::DbId;
use leasehold_db::models::payment::{Payment, Settlement};
use leasehold_db::repositories::LeaseRepo;
use leasehold_providers::{
    InitializeRequest, PaymentGateway, PaymentSession, PaystackEvent, Transaction,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::engine;
use crate::error::{AppError, AppResult};
use crate::handlers::trimmed;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA512 of the webhook body.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Request body for starting a checkout session.
#[derive(Debug, Deserialize, Validate)]
pub struct InitializePaymentRequest {
    #[validate(required)]
    pub lease_id: Option<DbId>,
    #[validate(required)]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct InitializePaymentResponse {
    pub success: bool,
    pub data: PaymentSession,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: &'static str,
    pub payment: Payment,
    pub data: Transaction,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub event: String,
}

fn gateway(state: &AppState) -> AppResult<&Arc<dyn PaymentGateway>> {
    state
        .payment_gateway
        .as_ref()
        .ok_or(AppError::NotConfigured("Payment service is not configured"))
}

/// POST /api/v1/payments/initialize
pub async fn initialize(
    State(state): State<AppState>,
    Json(input): Json<InitializePaymentRequest>,
) -> AppResult<Json<InitializePaymentResponse>> {
    input.validate()?;
    let (lease_id, amount) = match (input.lease_id, input.amount) {
        (Some(lease_id), Some(amount)) => (lease_id, amount),
        _ => return Err(AppError::BadRequest("lease_id and amount are required".into())),
    };
    validate_amount(amount)?;

    let lease = LeaseRepo::find_by_id(&state.pool, lease_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Lease", lease_id))?;
    let gateway = gateway(&state)?;

    let reference = generate_reference(lease.id, Utc::now());
    let request = InitializeRequest {
        email: input.email,
        amount: to_minor_units(amount),
        currency: state.config.payments.currency.clone(),
        reference,
        callback_url: state.config.payments.callback_url(),
        metadata: json!({
            "lease_id": lease.id,
            "property_id": lease.property_id,
            "tenant_id": lease.tenant_clerk_id,
        }),
    };
    let session = gateway.initialize(&request).await?;

    tracing::info!(lease_id = lease.id, reference = %session.reference, "Payment initialized");
    Ok(Json(InitializePaymentResponse {
        success: true,
        data: session,
    }))
}

/// GET /api/v1/payments/verify/{reference}
pub async fn verify(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let gateway = gateway(&state)?;
    let transaction = gateway.verify(&reference).await?;

    if !transaction.is_success() {
        tracing::info!(
            reference = %reference,
            status = %transaction.status,
            "Payment not successful",
        );
        return Err(AppError::PaymentNotSuccessful(transaction.status));
    }

    let settlement = engine::settlement::record(&state.pool, &transaction).await?;
    let message = match settlement {
        Settlement::Recorded(_) => "Payment verified and recorded",
        Settlement::AlreadyRecorded(_) => "Payment already recorded",
    };
    Ok(Json(VerifyPaymentResponse {
        success: true,
        message,
        payment: settlement.into_payment(),
        data: transaction,
    }))
}

/// POST /api/v1/payments/webhook
///
/// The signature is checked against the raw body before anything is parsed.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let secret = state
        .config
        .payments
        .secret_key
        .as_deref()
        .ok_or(AppError::NotConfigured("Payment service is not configured"))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CoreError::Unauthorized("Missing webhook signature".into()))?;
    verify_payment_webhook(secret, &body, signature)?;

    let event = PaystackEvent::from_json(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {e}")))?;

    match &event {
        PaystackEvent::ChargeSuccess(transaction) if transaction.is_success() => {
            engine::settlement::record(&state.pool, transaction).await?;
        }
        other => {
            tracing::debug!(event = other.name(), "Ignoring payment webhook event");
        }
    }

    Ok(Json(WebhookAck {
        success: true,
        event: event.name().to_string(),
    }))
}
