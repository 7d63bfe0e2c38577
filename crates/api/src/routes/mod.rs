pub mod applications;
pub mod health;
pub mod leases;
pub mod managers;
pub mod payments;
pub mod properties;
pub mod tenants;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /properties                                      search, create (auth)
/// /properties/{id}                                 get
/// /properties/{id}/leases                          leases on the property
///
/// /tenants                                         register (auth)
/// /tenants/{clerk_id}                              get, update (auth)
/// /tenants/{clerk_id}/current-residences           residences
/// /tenants/{clerk_id}/favorites/{property_id}      add, remove (auth)
/// /tenants/{clerk_id}/stats                        counts and totals
/// /tenants/{clerk_id}/recent-properties            recently applied to
///
/// /managers                                        register (auth)
/// /managers/{clerk_id}                             get, update (auth)
/// /managers/{clerk_id}/properties                  owned properties
///
/// /applications                                    list, submit (auth)
/// /applications/{id}/status                        decide (auth, manager)
///
/// /leases                                          list
/// /leases/{id}/payments                            payments for a lease
///
/// /payments/initialize                             start checkout
/// /payments/verify/{reference}                     verify and record
/// /payments/webhook                                gateway push (signed)
/// /payments/lease/{lease_id}                       payments for a lease
///
/// /webhooks/clerk                                  identity sync (signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/properties", properties::router())
        .nest("/tenants", tenants::router())
        .nest("/managers", managers::router())
        .nest("/applications", applications::router())
        .nest("/leases", leases::router())
        .nest("/payments", payments::router())
        .nest("/webhooks", webhooks::router())
}
