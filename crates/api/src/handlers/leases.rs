//! Handlers for the `/leases` resource.

use axum::extract::{Path, State};
use axum::Json;
use leasehold_core::error::CoreError;
use leasehold_core::types::DbId;
use leasehold_db::models::lease::Lease;
use leasehold_db::models::payment::Payment;
use leasehold_db::repositories::{LeaseRepo, PaymentRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/leases
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Lease>>>> {
    let leases = LeaseRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: leases }))
}

/// GET /api/v1/leases/{id}/payments
///
/// Also served at GET /api/v1/payments/lease/{id}.
pub async fn payments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    LeaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Lease", id))?;
    let payments = PaymentRepo::list_by_lease(&state.pool, id).await?;
    Ok(Json(DataResponse { data: payments }))
}
