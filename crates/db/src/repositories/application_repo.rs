//! Repository for the `applications` table.

use leasehold_core::application::ACTIVE_STATUSES;
use leasehold_core::status::{ApplicationStatus, StatusId};
use leasehold_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::application::{Application, CreateApplication};

const COLUMNS: &str = "id, application_date, status_id, property_id, tenant_clerk_id, name, \
    email, phone_number, message, lease_id, created_at, updated_at";

/// Columns for queries that alias `applications` as `a`.
const JOINED_COLUMNS: &str = "a.id, a.application_date, a.status_id, a.property_id, \
    a.tenant_clerk_id, a.name, a.email, a.phone_number, a.message, a.lease_id, a.created_at, \
    a.updated_at";

/// Provides CRUD and workflow steps for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Whether the tenant already holds a Pending or Approved application
    /// for the property.
    pub async fn has_active(
        conn: &mut PgConnection,
        tenant_clerk_id: &str,
        property_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let active: Vec<StatusId> = ACTIVE_STATUSES.iter().map(|s| s.id()).collect();
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM applications
                WHERE tenant_clerk_id = $1 AND property_id = $2 AND status_id = ANY($3)
             )",
        )
        .bind(tenant_clerk_id)
        .bind(property_id)
        .bind(&active)
        .fetch_one(conn)
        .await
    }

    /// Insert a Pending application dated now.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications
                (application_date, status_id, property_id, tenant_clerk_id, name, email,
                 phone_number, message)
             VALUES (NOW(), $1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(ApplicationStatus::Pending.id())
            .bind(input.property_id)
            .bind(&input.tenant_clerk_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.message)
            .fetch_one(conn)
            .await
    }

    /// Load an application and hold a row lock until the transaction ends.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Set the status and, when given, the lease created for the application.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: ApplicationStatus,
        lease_id: Option<DbId>,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                status_id = $2,
                lease_id = COALESCE($3, lease_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status.id())
            .bind(lease_id)
            .fetch_one(conn)
            .await
    }

    /// A tenant's applications, newest first.
    pub async fn list_for_tenant(
        pool: &PgPool,
        tenant_clerk_id: &str,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE tenant_clerk_id = $1
             ORDER BY application_date DESC, id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(tenant_clerk_id)
            .fetch_all(pool)
            .await
    }

    /// Applications for any property the manager owns, newest first.
    ///
    /// When `status` is given only applications in that state are returned.
    pub async fn list_for_manager(
        pool: &PgPool,
        manager_clerk_id: &str,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM applications a JOIN properties p ON p.id = a.property_id
             WHERE p.manager_clerk_id = $1 AND ($2::SMALLINT IS NULL OR a.status_id = $2)
             ORDER BY a.application_date DESC, a.id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(manager_clerk_id)
            .bind(status.map(ApplicationStatus::id))
            .fetch_all(pool)
            .await
    }
}
