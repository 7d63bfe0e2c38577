//! Tenant entity model and DTOs.

use leasehold_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::property::PropertyWithLocation;

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a tenant.
#[derive(Debug, Clone)]
pub struct CreateTenant {
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// DTO for updating a tenant. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateTenant {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone_number.is_none()
    }
}

/// Tenant with their favorite properties.
#[derive(Debug, Clone, Serialize)]
pub struct TenantWithFavorites {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub favorites: Vec<PropertyWithLocation>,
}

/// Dashboard counters for one tenant.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct TenantStats {
    pub favorites: i64,
    pub pending_applications: i64,
    pub approved_applications: i64,
    pub denied_applications: i64,
    pub active_leases: i64,
    pub total_paid: f64,
}
