use std::sync::Arc;

use leasehold_providers::{Geocoder, PaymentGateway};

use crate::auth::jwt::TokenVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: leasehold_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Session-token verifier; `None` when no public key is configured.
    pub token_verifier: Option<Arc<TokenVerifier>>,
    /// Payment gateway; `None` when no gateway secret is configured.
    pub payment_gateway: Option<Arc<dyn PaymentGateway>>,
    pub geocoder: Arc<dyn Geocoder>,
}
