//! Manager entity model and DTOs.

use leasehold_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::application::Application;
use crate::models::lease::Lease;
use crate::models::property::PropertyWithLocation;

/// A row from the `managers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Manager {
    pub id: DbId,
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a manager.
#[derive(Debug, Clone)]
pub struct CreateManager {
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// DTO for updating a manager. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateManager {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateManager {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone_number.is_none()
    }
}

/// A managed property with its leases and still-pending applications.
#[derive(Debug, Clone, Serialize)]
pub struct ManagedProperty {
    #[serde(flatten)]
    pub property: PropertyWithLocation,
    pub leases: Vec<Lease>,
    pub applications: Vec<Application>,
}
