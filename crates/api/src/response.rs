//! Success envelope for entity endpoints.
//!
//! Properties, tenants, managers, applications and leases answer
//! `{ "data": ... }`. The payment and webhook endpoints keep their own
//! `{ "success": true, ... }` shapes.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
