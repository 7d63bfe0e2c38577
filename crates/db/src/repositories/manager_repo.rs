//! Repository for the `managers` table.

use sqlx::{PgExecutor, PgPool};

use crate::models::manager::{CreateManager, Manager, UpdateManager};

const COLUMNS: &str = "id, clerk_id, name, email, phone_number, created_at, updated_at";

/// Provides CRUD operations for managers.
pub struct ManagerRepo;

impl ManagerRepo {
    /// Insert a manager unless one already exists for the identity.
    ///
    /// Returns `None` when the row already existed.
    pub async fn insert_if_absent(
        pool: &PgPool,
        input: &CreateManager,
    ) -> Result<Option<Manager>, sqlx::Error> {
        let query = format!(
            "INSERT INTO managers (clerk_id, name, email, phone_number)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (clerk_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manager>(&query)
            .bind(&input.clerk_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_optional(pool)
            .await
    }

    /// Find a manager by external identity id.
    pub async fn find_by_clerk_id<'e, E: PgExecutor<'e>>(
        executor: E,
        clerk_id: &str,
    ) -> Result<Option<Manager>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM managers WHERE clerk_id = $1");
        sqlx::query_as::<_, Manager>(&query)
            .bind(clerk_id)
            .fetch_optional(executor)
            .await
    }

    /// Load every manager whose identity id is in `clerk_ids`.
    pub async fn find_many_by_clerk_ids(
        pool: &PgPool,
        clerk_ids: &[String],
    ) -> Result<Vec<Manager>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM managers WHERE clerk_id = ANY($1)");
        sqlx::query_as::<_, Manager>(&query)
            .bind(clerk_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a manager. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        clerk_id: &str,
        input: &UpdateManager,
    ) -> Result<Option<Manager>, sqlx::Error> {
        let query = format!(
            "UPDATE managers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone_number = COALESCE($4, phone_number)
             WHERE clerk_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manager>(&query)
            .bind(clerk_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_optional(pool)
            .await
    }

    /// Delete a manager and, by cascade, their properties.
    pub async fn delete_by_clerk_id(pool: &PgPool, clerk_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM managers WHERE clerk_id = $1")
            .bind(clerk_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
