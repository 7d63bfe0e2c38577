//! Route definitions for the `/applications` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// GET    /                  -> list (?userId=&userType=)
/// POST   /                  -> create
/// PUT    /{id}/status       -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(applications::list).post(applications::create))
        .route("/{id}/status", put(applications::update_status))
}
