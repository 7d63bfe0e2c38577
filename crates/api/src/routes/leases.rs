//! Route definitions for the `/leases` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::leases;
use crate::state::AppState;

/// Routes mounted at `/leases`.
///
/// ```text
/// GET    /                  -> list
/// GET    /{id}/payments     -> payments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leases::list))
        .route("/{id}/payments", get(leases::payments))
}
