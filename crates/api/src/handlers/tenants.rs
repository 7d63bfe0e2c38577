//! Handlers for the `/tenants` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use leasehold_core::error::CoreError;
use leasehold_core::types::DbId;
use leasehold_db::models::property::PropertyWithLocation;
use leasehold_db::models::tenant::{
    CreateTenant, Tenant, TenantStats, TenantWithFavorites, UpdateTenant,
};
use leasehold_db::repositories::{PropertyRepo, TenantRepo};
use leasehold_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{trimmed, trimmed_opt};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body shared by tenant and manager registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterProfileRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub clerk_id: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email)]
    pub email: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub phone_number: String,
}

/// Request body shared by tenant and manager profile updates.
///
/// Blank fields are treated as absent.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub phone_number: Option<String>,
}

async fn find_tenant(pool: &DbPool, clerk_id: &str) -> AppResult<Tenant> {
    TenantRepo::find_by_clerk_id(pool, clerk_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Tenant", clerk_id)))
}

async fn with_favorites(pool: &DbPool, tenant: Tenant) -> AppResult<TenantWithFavorites> {
    let favorites = PropertyRepo::list_favorites(pool, tenant.id).await?;
    Ok(TenantWithFavorites { tenant, favorites })
}

/// POST /api/v1/tenants
///
/// Returns 201 for a new tenant, 200 with the existing row otherwise.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RegisterProfileRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Tenant>>)> {
    input.validate()?;
    auth.ensure_self(&input.clerk_id)?;

    let created = TenantRepo::insert_if_absent(
        &state.pool,
        &CreateTenant {
            clerk_id: input.clerk_id.clone(),
            name: input.name,
            email: input.email,
            phone_number: input.phone_number,
        },
    )
    .await?;

    match created {
        Some(tenant) => {
            tracing::info!(clerk_id = %tenant.clerk_id, "Tenant created");
            Ok((StatusCode::CREATED, Json(DataResponse { data: tenant })))
        }
        None => {
            let tenant = find_tenant(&state.pool, &input.clerk_id).await?;
            Ok((StatusCode::OK, Json(DataResponse { data: tenant })))
        }
    }
}

/// GET /api/v1/tenants/{clerk_id}
pub async fn get_by_clerk_id(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> AppResult<Json<DataResponse<TenantWithFavorites>>> {
    let tenant = find_tenant(&state.pool, &clerk_id).await?;
    let data = with_favorites(&state.pool, tenant).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/tenants/{clerk_id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<Tenant>>> {
    input.validate()?;
    auth.ensure_self(&clerk_id)?;

    let changes = UpdateTenant {
        name: input.name,
        email: input.email,
        phone_number: input.phone_number,
    };
    let tenant = if changes.is_empty() {
        find_tenant(&state.pool, &clerk_id).await?
    } else {
        TenantRepo::update(&state.pool, &clerk_id, &changes)
            .await?
            .ok_or_else(|| CoreError::not_found("Tenant", &clerk_id))?
    };
    Ok(Json(DataResponse { data: tenant }))
}

/// GET /api/v1/tenants/{clerk_id}/current-residences
pub async fn current_residences(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<PropertyWithLocation>>>> {
    let tenant = find_tenant(&state.pool, &clerk_id).await?;
    let properties = PropertyRepo::list_residences(&state.pool, tenant.id).await?;
    Ok(Json(DataResponse { data: properties }))
}

/// POST /api/v1/tenants/{clerk_id}/favorites/{property_id}
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((clerk_id, property_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<TenantWithFavorites>>> {
    auth.ensure_self(&clerk_id)?;

    let tenant = find_tenant(&state.pool, &clerk_id).await?;
    PropertyRepo::find_by_id(&state.pool, property_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Property", property_id))?;

    if !TenantRepo::add_favorite(&state.pool, tenant.id, property_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Property already added as favorite".into(),
        )));
    }

    let data = with_favorites(&state.pool, tenant).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/tenants/{clerk_id}/favorites/{property_id}
pub async fn remove_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((clerk_id, property_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<TenantWithFavorites>>> {
    auth.ensure_self(&clerk_id)?;

    let tenant = find_tenant(&state.pool, &clerk_id).await?;
    TenantRepo::remove_favorite(&state.pool, tenant.id, property_id).await?;

    let data = with_favorites(&state.pool, tenant).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/tenants/{clerk_id}/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> AppResult<Json<DataResponse<TenantStats>>> {
    let tenant = find_tenant(&state.pool, &clerk_id).await?;
    let stats = TenantRepo::stats(&state.pool, &tenant).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/tenants/{clerk_id}/recent-properties?limit=
pub async fn recent_properties(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyWithLocation>>>> {
    let tenant = find_tenant(&state.pool, &clerk_id).await?;
    let properties =
        PropertyRepo::list_recently_applied(&state.pool, &tenant.clerk_id, params.clamped())
            .await?;
    Ok(Json(DataResponse { data: properties }))
}
