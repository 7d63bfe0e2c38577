//! Handlers for the `/managers` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leasehold_core::error::CoreError;
use leasehold_core::status::ApplicationStatus;
use leasehold_core::types::DbId;
use leasehold_db::models::application::Application;
use leasehold_db::models::lease::Lease;
use leasehold_db::models::manager::{CreateManager, ManagedProperty, Manager, UpdateManager};
use leasehold_db::repositories::{ApplicationRepo, LeaseRepo, ManagerRepo, PropertyRepo};
use leasehold_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenants::{RegisterProfileRequest, UpdateProfileRequest};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_manager(pool: &DbPool, clerk_id: &str) -> AppResult<Manager> {
    ManagerRepo::find_by_clerk_id(pool, clerk_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Manager", clerk_id)))
}

/// POST /api/v1/managers
///
/// Returns 201 for a new manager, 200 with the existing row otherwise.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RegisterProfileRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Manager>>)> {
    input.validate()?;
    auth.ensure_self(&input.clerk_id)?;

    let created = ManagerRepo::insert_if_absent(
        &state.pool,
        &CreateManager {
            clerk_id: input.clerk_id.clone(),
            name: input.name,
            email: input.email,
            phone_number: input.phone_number,
        },
    )
    .await?;

    match created {
        Some(manager) => {
            tracing::info!(clerk_id = %manager.clerk_id, "Manager created");
            Ok((StatusCode::CREATED, Json(DataResponse { data: manager })))
        }
        None => {
            let manager = find_manager(&state.pool, &input.clerk_id).await?;
            Ok((StatusCode::OK, Json(DataResponse { data: manager })))
        }
    }
}

/// GET /api/v1/managers/{clerk_id}
pub async fn get_by_clerk_id(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> AppResult<Json<DataResponse<Manager>>> {
    let manager = find_manager(&state.pool, &clerk_id).await?;
    Ok(Json(DataResponse { data: manager }))
}

/// PUT /api/v1/managers/{clerk_id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<Manager>>> {
    input.validate()?;
    auth.ensure_self(&clerk_id)?;

    let changes = UpdateManager {
        name: input.name,
        email: input.email,
        phone_number: input.phone_number,
    };
    let manager = if changes.is_empty() {
        find_manager(&state.pool, &clerk_id).await?
    } else {
        ManagerRepo::update(&state.pool, &clerk_id, &changes)
            .await?
            .ok_or_else(|| CoreError::not_found("Manager", &clerk_id))?
    };
    Ok(Json(DataResponse { data: manager }))
}

/// GET /api/v1/managers/{clerk_id}/properties
///
/// Each property carries its leases and its still-pending applications.
pub async fn properties(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ManagedProperty>>>> {
    let manager = find_manager(&state.pool, &clerk_id).await?;

    let properties = PropertyRepo::list_by_manager(&state.pool, &manager.clerk_id).await?;
    let leases = LeaseRepo::list_for_manager(&state.pool, &manager.clerk_id).await?;
    let applications = ApplicationRepo::list_for_manager(
        &state.pool,
        &manager.clerk_id,
        Some(ApplicationStatus::Pending),
    )
    .await?;

    let mut leases_by_property: HashMap<DbId, Vec<Lease>> = HashMap::new();
    for lease in leases {
        leases_by_property.entry(lease.property_id).or_default().push(lease);
    }
    let mut applications_by_property: HashMap<DbId, Vec<Application>> = HashMap::new();
    for application in applications {
        applications_by_property
            .entry(application.property_id)
            .or_default()
            .push(application);
    }

    let data = properties
        .into_iter()
        .map(|property| {
            let id = property.property.id;
            ManagedProperty {
                property,
                leases: leases_by_property.remove(&id).unwrap_or_default(),
                applications: applications_by_property.remove(&id).unwrap_or_default(),
            }
        })
        .collect();
    Ok(Json(DataResponse { data }))
}
