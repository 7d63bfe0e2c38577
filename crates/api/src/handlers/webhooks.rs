//! Handlers for identity-provider webhooks.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use leasehold_core::identity::IdentityEvent;
use leasehold_core::signature::{verify_svix, SvixHeaders};
use serde::Serialize;

use crate::engine;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const SVIX_ID_HEADER: &str = "svix-id";
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

#[derive(Debug, Serialize)]
pub struct IdentityWebhookAck {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /api/v1/webhooks/clerk
pub async fn identity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<IdentityWebhookAck>> {
    let svix = match (
        header(&headers, SVIX_ID_HEADER),
        header(&headers, SVIX_TIMESTAMP_HEADER),
        header(&headers, SVIX_SIGNATURE_HEADER),
    ) {
        (Some(id), Some(timestamp), Some(signature)) => SvixHeaders {
            id,
            timestamp,
            signature,
        },
        _ => return Err(AppError::BadRequest("Missing svix headers".into())),
    };

    let secret = state
        .config
        .identity
        .webhook_secret
        .as_deref()
        .ok_or(AppError::NotConfigured("Identity webhook secret is not configured"))?;

    verify_svix(secret, &svix, &body, Utc::now())?;

    let event = IdentityEvent::from_json(&body)?;
    engine::identity::apply(&state.pool, &event).await?;

    Ok(Json(IdentityWebhookAck {
        success: true,
        kind: event.kind().to_string(),
    }))
}
