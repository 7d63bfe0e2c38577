//! Repository for the `leases` table.

use leasehold_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::lease::{CreateLease, Lease};

const COLUMNS: &str =
    "id, start_date, end_date, rent, deposit, property_id, tenant_clerk_id, created_at, updated_at";

/// Columns for queries that alias `leases` as `le`.
const JOINED_COLUMNS: &str = "le.id, le.start_date, le.end_date, le.rent, le.deposit, \
    le.property_id, le.tenant_clerk_id, le.created_at, le.updated_at";

pub struct LeaseRepo;

impl LeaseRepo {
    /// Insert a lease inside the caller's transaction.
    pub async fn create(conn: &mut PgConnection, input: &CreateLease) -> Result<Lease, sqlx::Error> {
        let query = format!(
            "INSERT INTO leases (start_date, end_date, rent, deposit, property_id, tenant_clerk_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lease>(&query)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.rent)
            .bind(input.deposit)
            .bind(input.property_id)
            .bind(&input.tenant_clerk_id)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lease>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leases WHERE id = $1");
        sqlx::query_as::<_, Lease>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Lease>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leases WHERE id = ANY($1)");
        sqlx::query_as::<_, Lease>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// All leases, newest start first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Lease>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leases ORDER BY start_date DESC, id DESC");
        sqlx::query_as::<_, Lease>(&query).fetch_all(pool).await
    }

    /// Leases on one property, newest start first.
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<Lease>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leases WHERE property_id = $1 ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Lease>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }

    /// Leases on any property the manager owns, newest start first.
    pub async fn list_for_manager(
        pool: &PgPool,
        manager_clerk_id: &str,
    ) -> Result<Vec<Lease>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM leases le JOIN properties p ON p.id = le.property_id
             WHERE p.manager_clerk_id = $1
             ORDER BY le.start_date DESC, le.id DESC"
        );
        sqlx::query_as::<_, Lease>(&query)
            .bind(manager_clerk_id)
            .fetch_all(pool)
            .await
    }
}
