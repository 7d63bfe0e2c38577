//! Route definitions for the `/managers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::managers;
use crate::state::AppState;

/// Routes mounted at `/managers`.
///
/// ```text
/// POST   /                          -> create
/// GET    /{clerk_id}                -> get_by_clerk_id
/// PUT    /{clerk_id}                -> update
/// GET    /{clerk_id}/properties     -> properties
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(managers::create))
        .route(
            "/{clerk_id}",
            get(managers::get_by_clerk_id).put(managers::update),
        )
        .route("/{clerk_id}/properties", get(managers::properties))
}
