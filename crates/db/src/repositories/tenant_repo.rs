//! Repository for the `tenants` table and its favorite links.

use leasehold_core::status::ApplicationStatus;
use leasehold_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::tenant::{CreateTenant, Tenant, TenantStats, UpdateTenant};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, clerk_id, name, email, phone_number, created_at, updated_at";

/// Provides CRUD operations for tenants.
pub struct TenantRepo;

impl TenantRepo {
    /// Insert a tenant unless one already exists for the identity.
    ///
    /// Returns `None` when the row already existed.
    pub async fn insert_if_absent<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateTenant,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (clerk_id, name, email, phone_number)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (clerk_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(&input.clerk_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_optional(executor)
            .await
    }

    /// Return the tenant for the identity, creating it from `input` if absent.
    pub async fn ensure(
        conn: &mut PgConnection,
        input: &CreateTenant,
    ) -> Result<Tenant, sqlx::Error> {
        if let Some(tenant) = Self::insert_if_absent(&mut *conn, input).await? {
            return Ok(tenant);
        }
        let existing = Self::find_by_clerk_id(&mut *conn, &input.clerk_id).await?;
        existing.ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a tenant by external identity id.
    pub async fn find_by_clerk_id<'e, E: PgExecutor<'e>>(
        executor: E,
        clerk_id: &str,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE clerk_id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(clerk_id)
            .fetch_optional(executor)
            .await
    }

    /// Load every tenant whose identity id is in `clerk_ids`.
    pub async fn find_many_by_clerk_ids(
        pool: &PgPool,
        clerk_ids: &[String],
    ) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE clerk_id = ANY($1)");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(clerk_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a tenant. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no tenant exists for the identity.
    pub async fn update(
        pool: &PgPool,
        clerk_id: &str,
        input: &UpdateTenant,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!(
            "UPDATE tenants SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone_number = COALESCE($4, phone_number)
             WHERE clerk_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(clerk_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tenant and, by cascade, their applications, leases and links.
    /// Returns `true` if a row was removed.
    pub async fn delete_by_clerk_id(pool: &PgPool, clerk_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenants WHERE clerk_id = $1")
            .bind(clerk_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a property as a favorite. Returns `false` if it already was one.
    pub async fn add_favorite(
        pool: &PgPool,
        tenant_id: DbId,
        property_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO tenant_favorites (tenant_id, property_id) VALUES ($1, $2)
             ON CONFLICT (tenant_id, property_id) DO NOTHING",
        )
        .bind(tenant_id)
        .bind(property_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a favorite. Returns `true` if a link was removed.
    pub async fn remove_favorite(
        pool: &PgPool,
        tenant_id: DbId,
        property_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM tenant_favorites WHERE tenant_id = $1 AND property_id = $2")
                .bind(tenant_id)
                .bind(property_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Favorites, applications by status, active leases and money paid.
    pub async fn stats(pool: &PgPool, tenant: &Tenant) -> Result<TenantStats, sqlx::Error> {
        sqlx::query_as::<_, TenantStats>(
            "SELECT
                (SELECT COUNT(*) FROM tenant_favorites WHERE tenant_id = $1) AS favorites,
                (SELECT COUNT(*) FROM applications
                    WHERE tenant_clerk_id = $2 AND status_id = $3) AS pending_applications,
                (SELECT COUNT(*) FROM applications
                    WHERE tenant_clerk_id = $2 AND status_id = $4) AS approved_applications,
                (SELECT COUNT(*) FROM applications
                    WHERE tenant_clerk_id = $2 AND status_id = $5) AS denied_applications,
                (SELECT COUNT(*) FROM leases
                    WHERE tenant_clerk_id = $2 AND end_date > NOW()) AS active_leases,
                (SELECT COALESCE(SUM(pm.amount_paid), 0)::DOUBLE PRECISION
                    FROM payments pm JOIN leases le ON le.id = pm.lease_id
                    WHERE le.tenant_clerk_id = $2) AS total_paid",
        )
        .bind(tenant.id)
        .bind(&tenant.clerk_id)
        .bind(ApplicationStatus::Pending.id())
        .bind(ApplicationStatus::Approved.id())
        .bind(ApplicationStatus::Denied.id())
        .fetch_one(pool)
        .await
    }
}
