//! Repository for the `payments` table.

use leasehold_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::payment::{CreatePayment, Payment, Settlement};

const COLUMNS: &str = "id, lease_id, amount_due, amount_paid, due_date, payment_date, status_id, \
    provider_reference, created_at, updated_at";

pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a payment inside the caller's transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreatePayment,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                (lease_id, amount_due, amount_paid, due_date, payment_date, status_id,
                 provider_reference)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.lease_id)
            .bind(input.amount_due)
            .bind(input.amount_paid)
            .bind(input.due_date)
            .bind(input.payment_date)
            .bind(input.status.id())
            .bind(&input.provider_reference)
            .fetch_one(conn)
            .await
    }

    /// Record a provider-confirmed payment at most once per reference.
    ///
    /// Concurrent deliveries of the same reference (verify polling racing
    /// the webhook) converge on one row: the loser of the insert sees no
    /// returned row and reads back the winner's.
    pub async fn record_settlement(
        pool: &PgPool,
        input: &CreatePayment,
    ) -> Result<Settlement, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO payments
                (lease_id, amount_due, amount_paid, due_date, payment_date, status_id,
                 provider_reference)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (provider_reference) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Payment>(&query)
            .bind(input.lease_id)
            .bind(input.amount_due)
            .bind(input.amount_paid)
            .bind(input.due_date)
            .bind(input.payment_date)
            .bind(input.status.id())
            .bind(&input.provider_reference)
            .fetch_optional(&mut *tx)
            .await?;

        let settlement = match inserted {
            Some(payment) => Settlement::Recorded(payment),
            None => {
                let query = format!("SELECT {COLUMNS} FROM payments WHERE provider_reference = $1");
                let existing = sqlx::query_as::<_, Payment>(&query)
                    .bind(&input.provider_reference)
                    .fetch_one(&mut *tx)
                    .await?;
                Settlement::AlreadyRecorded(existing)
            }
        };

        tx.commit().await?;
        Ok(settlement)
    }

    /// Payments for a lease, latest due date first.
    pub async fn list_by_lease(pool: &PgPool, lease_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE lease_id = $1 ORDER BY due_date DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(lease_id)
            .fetch_all(pool)
            .await
    }
}
