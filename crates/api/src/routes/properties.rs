//! Route definitions for the `/properties` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::properties;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /                   -> search
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// GET    /{id}/leases        -> leases
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(properties::search).post(properties::create))
        .route("/{id}", get(properties::get_by_id))
        .route("/{id}/leases", get(properties::leases))
}
