//! Handlers for the `/applications` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use leasehold_core::application::Decision;
use leasehold_core::types::DbId;
use leasehold_db::models::application::{ApplicationDetail, CreateApplication};
use leasehold_db::repositories::ApplicationRepo;
use serde::Deserialize;
use validator::Validate;

use crate::engine;
use crate::error::{AppError, AppResult};
use crate::handlers::{trimmed, trimmed_opt};
use crate::middleware::auth::AuthUser;
use crate::query::ApplicationListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for submitting an application.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitApplicationRequest {
    #[validate(required)]
    pub property_id: Option<DbId>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub tenant_clerk_id: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email)]
    pub email: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub message: Option<String>,
}

/// Request body for deciding an application.
#[derive(Debug, Deserialize)]
pub struct DecideApplicationRequest {
    #[serde(default)]
    pub status: String,
}

/// Which side of the marketplace is listing applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Viewer {
    Tenant,
    Manager,
}

fn parse_viewer(params: &ApplicationListParams) -> AppResult<(String, Viewer)> {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId and userType are required".into()))?;
    let viewer = match params.user_type.as_deref().map(str::trim) {
        Some(t) if t.eq_ignore_ascii_case("tenant") => Viewer::Tenant,
        Some(t) if t.eq_ignore_ascii_case("manager") => Viewer::Manager,
        _ => {
            return Err(AppError::BadRequest(
                "userType must be 'tenant' or 'manager'".into(),
            ))
        }
    };
    Ok((user_id.to_string(), viewer))
}

/// POST /api/v1/applications
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitApplicationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ApplicationDetail>>)> {
    input.validate()?;
    auth.ensure_self(&input.tenant_clerk_id)?;

    let SubmitApplicationRequest {
        property_id,
        tenant_clerk_id,
        name,
        email,
        phone_number,
        message,
    } = input;
    let property_id =
        property_id.ok_or_else(|| AppError::BadRequest("property_id is required".into()))?;

    let detail = engine::application::submit(
        &state.pool,
        &CreateApplication {
            property_id,
            tenant_clerk_id,
            name,
            email,
            phone_number,
            message,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/applications/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecideApplicationRequest>,
) -> AppResult<Json<DataResponse<ApplicationDetail>>> {
    let decision = Decision::parse(input.status.trim())?;
    let detail = engine::application::decide(&state.pool, id, decision, &auth.clerk_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/applications?userId=&userType=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ApplicationListParams>,
) -> AppResult<Json<DataResponse<Vec<ApplicationDetail>>>> {
    let (user_id, viewer) = parse_viewer(&params)?;
    let applications = match viewer {
        Viewer::Tenant => ApplicationRepo::list_for_tenant(&state.pool, &user_id).await?,
        Viewer::Manager => ApplicationRepo::list_for_manager(&state.pool, &user_id, None).await?,
    };
    let details = engine::application::load_details(&state.pool, applications).await?;
    Ok(Json(DataResponse { data: details }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params(user_id: Option<&str>, user_type: Option<&str>) -> ApplicationListParams {
        ApplicationListParams {
            user_id: user_id.map(String::from),
            user_type: user_type.map(String::from),
        }
    }

    #[test]
    fn viewer_requires_both_parameters() {
        assert_matches!(parse_viewer(&params(None, Some("tenant"))), Err(AppError::BadRequest(_)));
        assert_matches!(parse_viewer(&params(Some("u1"), None)), Err(AppError::BadRequest(_)));
        assert_matches!(
            parse_viewer(&params(Some("u1"), Some("admin"))),
            Err(AppError::BadRequest(_))
        );
    }

    #[test]
    fn viewer_is_case_insensitive() {
        let (id, viewer) = parse_viewer(&params(Some(" u1 "), Some("Manager"))).unwrap();
        assert_eq!(id, "u1");
        assert_eq!(viewer, Viewer::Manager);
    }

    #[test]
    fn submit_request_rejects_blank_fields() {
        let body: SubmitApplicationRequest = serde_json::from_value(serde_json::json!({
            "property_id": 1,
            "tenant_clerk_id": "u1",
            "name": "   ",
            "email": "not-an-email",
            "phone_number": "+233"
        }))
        .unwrap();
        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("phone_number"));
    }
}
