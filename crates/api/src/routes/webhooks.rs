//! Route definitions for inbound provider webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST   /clerk             -> identity
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/clerk", post(webhooks::identity))
}
