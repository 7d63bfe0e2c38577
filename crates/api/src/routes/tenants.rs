//! Route definitions for the `/tenants` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tenants;
use crate::state::AppState;

/// Routes mounted at `/tenants`.
///
/// ```text
/// POST   /                                        -> create
/// GET    /{clerk_id}                              -> get_by_clerk_id
/// PUT    /{clerk_id}                              -> update
/// GET    /{clerk_id}/current-residences           -> current_residences
/// POST   /{clerk_id}/favorites/{property_id}      -> add_favorite
/// DELETE /{clerk_id}/favorites/{property_id}      -> remove_favorite
/// GET    /{clerk_id}/stats                        -> stats
/// GET    /{clerk_id}/recent-properties            -> recent_properties
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tenants::create))
        .route(
            "/{clerk_id}",
            get(tenants::get_by_clerk_id).put(tenants::update),
        )
        .route(
            "/{clerk_id}/current-residences",
            get(tenants::current_residences),
        )
        .route(
            "/{clerk_id}/favorites/{property_id}",
            post(tenants::add_favorite).delete(tenants::remove_favorite),
        )
        .route("/{clerk_id}/stats", get(tenants::stats))
        .route(
            "/{clerk_id}/recent-properties",
            get(tenants::recent_properties),
        )
}
