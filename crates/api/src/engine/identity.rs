//! Mirrors identity-provider lifecycle events into tenant and manager rows.
//!
//! Every branch is idempotent so redelivered webhooks are harmless.

use leasehold_core::identity::{IdentityEvent, IdentityProfile, DEFAULT_DISPLAY_NAME};
use leasehold_db::models::manager::{CreateManager, UpdateManager};
use leasehold_db::models::tenant::{CreateTenant, UpdateTenant};
use leasehold_db::repositories::{ManagerRepo, TenantRepo};
use leasehold_db::DbPool;

use crate::error::AppResult;

/// Apply one decoded event.
pub async fn apply(pool: &DbPool, event: &IdentityEvent) -> AppResult<()> {
    match event {
        IdentityEvent::Created(user) => created(pool, &user.profile()).await,
        IdentityEvent::Updated(user) => updated(pool, &user.profile()).await,
        IdentityEvent::Deleted(deleted) => {
            let tenant = TenantRepo::delete_by_clerk_id(pool, &deleted.id).await?;
            let manager = ManagerRepo::delete_by_clerk_id(pool, &deleted.id).await?;
            tracing::info!(clerk_id = %deleted.id, tenant, manager, "Identity deleted");
            Ok(())
        }
        IdentityEvent::Unhandled(kind) => {
            tracing::debug!(event = %kind, "Ignoring identity event");
            Ok(())
        }
    }
}

async fn created(pool: &DbPool, profile: &IdentityProfile) -> AppResult<()> {
    let name = profile
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
    let email = profile.email.clone().unwrap_or_default();
    let phone_number = profile.phone_number.clone().unwrap_or_default();

    let tenant = TenantRepo::insert_if_absent(
        pool,
        &CreateTenant {
            clerk_id: profile.clerk_id.clone(),
            name: name.clone(),
            email: email.clone(),
            phone_number: phone_number.clone(),
        },
    )
    .await?;

    let manager = if profile.is_manager {
        ManagerRepo::insert_if_absent(
            pool,
            &CreateManager {
                clerk_id: profile.clerk_id.clone(),
                name,
                email,
                phone_number,
            },
        )
        .await?
    } else {
        None
    };

    tracing::info!(
        clerk_id = %profile.clerk_id,
        tenant_created = tenant.is_some(),
        manager_created = manager.is_some(),
        "Identity created",
    );
    Ok(())
}

async fn updated(pool: &DbPool, profile: &IdentityProfile) -> AppResult<()> {
    let tenant_update = UpdateTenant {
        name: profile.name.clone(),
        email: profile.email.clone(),
        phone_number: profile.phone_number.clone(),
    };
    if tenant_update.is_empty() {
        return Ok(());
    }
    let manager_update = UpdateManager {
        name: tenant_update.name.clone(),
        email: tenant_update.email.clone(),
        phone_number: tenant_update.phone_number.clone(),
    };

    let tenant = TenantRepo::update(pool, &profile.clerk_id, &tenant_update).await?;
    let manager = ManagerRepo::update(pool, &profile.clerk_id, &manager_update).await?;

    tracing::info!(
        clerk_id = %profile.clerk_id,
        tenant = tenant.is_some(),
        manager = manager.is_some(),
        "Identity updated",
    );
    Ok(())
}
