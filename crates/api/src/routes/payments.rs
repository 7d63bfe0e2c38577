//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{leases, payments};
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST   /initialize              -> initialize
/// GET    /verify/{reference}      -> verify
/// POST   /webhook                 -> webhook
/// GET    /lease/{lease_id}        -> leases::payments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/initialize", post(payments::initialize))
        .route("/verify/{reference}", get(payments::verify))
        .route("/webhook", post(payments::webhook))
        .route("/lease/{lease_id}", get(leases::payments))
}
