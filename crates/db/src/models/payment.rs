//! Payment entity model and DTOs.

use leasehold_core::status::PaymentStatus;
use leasehold_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub lease_id: DbId,
    pub amount_due: f64,
    pub amount_paid: f64,
    pub due_date: Timestamp,
    pub payment_date: Option<Timestamp>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a payment.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub lease_id: DbId,
    pub amount_due: f64,
    pub amount_paid: f64,
    pub due_date: Timestamp,
    pub payment_date: Option<Timestamp>,
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
}

/// Result of recording a provider-confirmed settlement.
#[derive(Debug, Clone)]
pub enum Settlement {
    /// A new payment row was written.
    Recorded(Payment),
    /// A payment with the same provider reference already existed.
    AlreadyRecorded(Payment),
}

impl Settlement {
    pub fn payment(&self) -> &Payment {
        match self {
            Settlement::Recorded(p) | Settlement::AlreadyRecorded(p) => p,
        }
    }

    pub fn into_payment(self) -> Payment {
        match self {
            Settlement::Recorded(p) | Settlement::AlreadyRecorded(p) => p,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Settlement::Recorded(_))
    }
}
