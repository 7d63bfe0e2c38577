//! Recording of provider-confirmed payments.
//!
//! Verify polling and the `charge.success` webhook both land here. The
//! payments table's unique reference makes recording at-most-once no matter
//! which path (or how many deliveries) arrives first.

use chrono::Utc;
use leasehold_core::error::CoreError;
use leasehold_core::status::PaymentStatus;
use leasehold_db::models::payment::{CreatePayment, Settlement};
use leasehold_db::repositories::{LeaseRepo, PaymentRepo};
use leasehold_db::DbPool;
use leasehold_providers::Transaction;

use crate::error::{AppError, AppResult};

/// Record a successful gateway transaction against its lease.
///
/// The caller is responsible for checking [`Transaction::is_success`].
pub async fn record(pool: &DbPool, transaction: &Transaction) -> AppResult<Settlement> {
    let lease_id = transaction.lease_id().ok_or_else(|| {
        AppError::BadRequest(format!(
            "Transaction {} does not identify a lease",
            transaction.reference
        ))
    })?;

    LeaseRepo::find_by_id(pool, lease_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Lease", lease_id))?;

    let now = Utc::now();
    let amount = transaction.amount_major();
    let settlement = PaymentRepo::record_settlement(
        pool,
        &CreatePayment {
            lease_id,
            amount_due: amount,
            amount_paid: amount,
            due_date: now,
            payment_date: Some(now),
            status: PaymentStatus::Paid,
            provider_reference: Some(transaction.reference.clone()),
        },
    )
    .await?;

    if settlement.is_new() {
        tracing::info!(
            lease_id,
            payment_id = settlement.payment().id,
            reference = %transaction.reference,
            amount,
            "Payment recorded",
        );
    } else {
        tracing::debug!(
            lease_id,
            reference = %transaction.reference,
            "Payment already recorded",
        );
    }

    Ok(settlement)
}
