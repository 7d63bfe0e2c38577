//! Application entity model and DTOs.

use leasehold_core::status::ApplicationStatus;
use leasehold_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::lease::ScheduledLease;
use crate::models::manager::Manager;
use crate::models::property::PropertyWithLocation;
use crate::models::tenant::Tenant;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub application_date: Timestamp,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ApplicationStatus,
    pub property_id: DbId,
    pub tenant_clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    pub lease_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a Pending application.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub property_id: DbId,
    pub tenant_clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
}

/// An application with its property, the property's manager, the applicant
/// and (once approved) the lease.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub property: PropertyWithLocation,
    pub manager: Option<Manager>,
    pub tenant: Option<Tenant>,
    pub lease: Option<ScheduledLease>,
}
