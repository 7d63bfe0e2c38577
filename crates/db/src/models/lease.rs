//! Lease entity model and DTOs.

use leasehold_core::lease::next_payment_date;
use leasehold_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `leases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lease {
    pub id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub rent: f64,
    pub deposit: f64,
    pub property_id: DbId,
    pub tenant_clerk_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a lease.
#[derive(Debug, Clone)]
pub struct CreateLease {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub rent: f64,
    pub deposit: f64,
    pub property_id: DbId,
    pub tenant_clerk_id: String,
}

/// A lease annotated with its next monthly due date.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledLease {
    #[serde(flatten)]
    pub lease: Lease,
    pub next_payment_date: Timestamp,
}

impl ScheduledLease {
    pub fn new(lease: Lease, now: Timestamp) -> Self {
        let next_payment_date = next_payment_date(lease.start_date, now);
        Self {
            lease,
            next_payment_date,
        }
    }
}
