//! Application submission and decision workflows.
//!
//! Both run in a single transaction. Submission upserts the tenant and
//! refuses a second active application for the same property; the decision
//! locks the application row so two managers deciding at once serialize,
//! and on approval creates the lease, its first payment, and the residency
//! link before flipping the status.

use std::collections::HashMap;

use chrono::Utc;
use leasehold_core::application::{apply_decision, Decision};
use leasehold_core::error::CoreError;
use leasehold_core::lease::lease_term;
use leasehold_core::status::{ApplicationStatus, PaymentStatus};
use leasehold_core::types::DbId;
use leasehold_db::models::application::{Application, ApplicationDetail, CreateApplication};
use leasehold_db::models::lease::{CreateLease, ScheduledLease};
use leasehold_db::models::payment::CreatePayment;
use leasehold_db::models::tenant::CreateTenant;
use leasehold_db::repositories::{
    ApplicationRepo, LeaseRepo, ManagerRepo, PaymentRepo, PropertyRepo, TenantRepo,
};
use leasehold_db::DbPool;

use crate::error::{unique_violation, AppError, AppResult};

/// Partial unique index backing the one-active-application rule.
const ACTIVE_APPLICATION_INDEX: &str = "uq_applications_active_tenant_property";

fn duplicate_application() -> AppError {
    AppError::Core(CoreError::Conflict(
        "You already have an active application for this property".into(),
    ))
}

/// Submit a Pending application, creating the tenant from the contact
/// details when they have no row yet.
pub async fn submit(pool: &DbPool, input: &CreateApplication) -> AppResult<ApplicationDetail> {
    let mut tx = pool.begin().await?;

    PropertyRepo::find_by_id(&mut *tx, input.property_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Property", input.property_id))?;

    TenantRepo::ensure(
        &mut *tx,
        &CreateTenant {
            clerk_id: input.tenant_clerk_id.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
        },
    )
    .await?;

    if ApplicationRepo::has_active(&mut *tx, &input.tenant_clerk_id, input.property_id).await? {
        return Err(duplicate_application());
    }

    // A concurrent submission can still slip past the check above; the
    // index rejects it and we report the same conflict.
    let application = ApplicationRepo::create(&mut *tx, input)
        .await
        .map_err(|err| {
            if unique_violation(&err) == Some(ACTIVE_APPLICATION_INDEX) {
                duplicate_application()
            } else {
                AppError::Database(err)
            }
        })?;

    tx.commit().await?;

    tracing::info!(
        application_id = application.id,
        property_id = application.property_id,
        clerk_id = %application.tenant_clerk_id,
        "Application submitted",
    );

    load_detail(pool, application).await
}

/// Approve or deny a pending application on behalf of `manager_clerk_id`.
pub async fn decide(
    pool: &DbPool,
    application_id: DbId,
    decision: Decision,
    manager_clerk_id: &str,
) -> AppResult<ApplicationDetail> {
    let mut tx = pool.begin().await?;

    let application = ApplicationRepo::lock_for_update(&mut *tx, application_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Application", application_id))?;

    let property = PropertyRepo::find_by_id(&mut *tx, application.property_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Property", application.property_id))?;

    if property.manager_clerk_id != manager_clerk_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the property's manager can decide this application".into(),
        )));
    }

    let status = apply_decision(application.status, decision)?;

    let lease_id = match status {
        ApplicationStatus::Approved => {
            let now = Utc::now();
            let (start_date, end_date) = lease_term(now);

            let lease = LeaseRepo::create(
                &mut *tx,
                &CreateLease {
                    start_date,
                    end_date,
                    rent: property.price_per_month,
                    deposit: property.security_deposit,
                    property_id: property.id,
                    tenant_clerk_id: application.tenant_clerk_id.clone(),
                },
            )
            .await?;

            PaymentRepo::create(
                &mut *tx,
                &CreatePayment {
                    lease_id: lease.id,
                    amount_due: property.price_per_month,
                    amount_paid: 0.0,
                    due_date: now,
                    payment_date: None,
                    status: PaymentStatus::Pending,
                    provider_reference: None,
                },
            )
            .await?;

            let tenant = TenantRepo::find_by_clerk_id(&mut *tx, &application.tenant_clerk_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Tenant", &application.tenant_clerk_id))?;
            PropertyRepo::add_resident(&mut *tx, property.id, tenant.id).await?;

            Some(lease.id)
        }
        ApplicationStatus::Denied | ApplicationStatus::Pending => None,
    };

    let updated = ApplicationRepo::update_status(&mut *tx, application.id, status, lease_id).await?;

    tx.commit().await?;

    tracing::info!(
        application_id = updated.id,
        status = %updated.status,
        lease_id = ?updated.lease_id,
        clerk_id = %manager_clerk_id,
        "Application decided",
    );

    load_detail(pool, updated).await
}

/// Attach property, manager, tenant and lease to one application.
pub async fn load_detail(pool: &DbPool, application: Application) -> AppResult<ApplicationDetail> {
    let mut details = load_details(pool, vec![application]).await?;
    details
        .pop()
        .ok_or_else(|| AppError::InternalError("Application property vanished".into()))
}

/// Attach related rows to a batch of applications, preserving order.
///
/// Each relation is loaded with one query for the whole batch.
pub async fn load_details(
    pool: &DbPool,
    applications: Vec<Application>,
) -> AppResult<Vec<ApplicationDetail>> {
    if applications.is_empty() {
        return Ok(Vec::new());
    }

    let property_ids = unique(applications.iter().map(|a| a.property_id));
    let lease_ids = unique(applications.iter().filter_map(|a| a.lease_id));
    let tenant_ids = unique(applications.iter().map(|a| a.tenant_clerk_id.clone()));

    let properties: HashMap<DbId, _> =
        PropertyRepo::find_many_with_location(pool, &property_ids)
            .await?
            .into_iter()
            .map(|p| (p.property.id, p))
            .collect();

    let manager_ids = unique(
        properties
            .values()
            .map(|p| p.property.manager_clerk_id.clone()),
    );
    let managers: HashMap<String, _> = ManagerRepo::find_many_by_clerk_ids(pool, &manager_ids)
        .await?
        .into_iter()
        .map(|m| (m.clerk_id.clone(), m))
        .collect();
    let tenants: HashMap<String, _> = TenantRepo::find_many_by_clerk_ids(pool, &tenant_ids)
        .await?
        .into_iter()
        .map(|t| (t.clerk_id.clone(), t))
        .collect();

    let now = Utc::now();
    let mut leases: HashMap<DbId, _> = if lease_ids.is_empty() {
        HashMap::new()
    } else {
        LeaseRepo::find_many(pool, &lease_ids)
            .await?
            .into_iter()
            .map(|l| (l.id, ScheduledLease::new(l, now)))
            .collect()
    };

    let details = applications
        .into_iter()
        .filter_map(|application| {
            let property = properties.get(&application.property_id)?.clone();
            let manager = managers.get(&property.property.manager_clerk_id).cloned();
            let tenant = tenants.get(&application.tenant_clerk_id).cloned();
            let lease = application.lease_id.and_then(|id| leases.remove(&id));
            Some(ApplicationDetail {
                application,
                property,
                manager,
                tenant,
                lease,
            })
        })
        .collect();

    Ok(details)
}

fn unique<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_unstable();
    items.dedup();
    items
}
