//! Handlers for the `/properties` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use leasehold_core::catalog::{validate_amenities, validate_highlights, validate_property_type};
use leasehold_core::error::CoreError;
use leasehold_core::geo::Coordinates;
use leasehold_core::search::{PropertyFilter, PropertySearchParams};
use leasehold_core::types::DbId;
use leasehold_db::models::lease::Lease;
use leasehold_db::models::location::CreateLocation;
use leasehold_db::models::property::{CreateProperty, PropertyWithLocation};
use leasehold_db::repositories::{LeaseRepo, ManagerRepo, PropertyRepo};
use leasehold_providers::GeocodeQuery;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::trimmed;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Accept either a JSON array of strings or a single comma-separated string.
fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Csv(String),
    }

    let values = match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::List(list)) => list,
        Some(Raw::Csv(csv)) => csv.split(',').map(str::to_string).collect(),
    };
    Ok(values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

/// Request body for listing a new property.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(required)]
    pub price_per_month: Option<f64>,
    #[serde(default)]
    pub security_deposit: f64,
    #[serde(default)]
    pub application_fee: f64,
    #[serde(default, deserialize_with = "string_list")]
    pub photo_urls: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub is_pets_allowed: bool,
    #[serde(default)]
    pub is_parking_included: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub beds: i32,
    #[serde(default)]
    pub baths: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub square_feet: i32,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub property_type: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub manager_clerk_id: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub address: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub state: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub country: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CreatePropertyRequest {
    /// Checks the derive cannot express: money signs and vocabularies.
    fn to_property(&self) -> Result<CreateProperty, CoreError> {
        let price_per_month = self.price_per_month.unwrap_or_default();
        if !price_per_month.is_finite() || price_per_month <= 0.0 {
            return Err(CoreError::Validation(
                "price_per_month must be a positive number".into(),
            ));
        }
        for (field, value) in [
            ("security_deposit", self.security_deposit),
            ("application_fee", self.application_fee),
            ("baths", self.baths),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{field} must not be negative"
                )));
            }
        }

        Ok(CreateProperty {
            name: self.name.clone(),
            description: self.description.clone(),
            price_per_month,
            security_deposit: self.security_deposit,
            application_fee: self.application_fee,
            photo_urls: self.photo_urls.clone(),
            amenities: validate_amenities(&self.amenities)?,
            highlights: validate_highlights(&self.highlights)?,
            is_pets_allowed: self.is_pets_allowed,
            is_parking_included: self.is_parking_included,
            beds: self.beds,
            baths: self.baths,
            square_feet: self.square_feet,
            property_type: validate_property_type(&self.property_type)?.to_string(),
            manager_clerk_id: self.manager_clerk_id.clone(),
        })
    }

    /// Supplied coordinates, unless absent or the (0, 0) placeholder.
    fn supplied_coordinates(&self) -> Result<Option<Coordinates>, CoreError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => {
                let coordinates = Coordinates::new(lat, lng)?;
                Ok((!coordinates.is_unset()).then_some(coordinates))
            }
            _ => Ok(None),
        }
    }

    fn geocode_query(&self) -> GeocodeQuery {
        GeocodeQuery {
            street: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

/// GET /api/v1/properties
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PropertySearchParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyWithLocation>>>> {
    let filter = PropertyFilter::from_params(&params);
    let properties = PropertyRepo::search(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: properties }))
}

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PropertyWithLocation>>> {
    let property = PropertyRepo::find_with_location(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Property", id))?;
    Ok(Json(DataResponse { data: property }))
}

/// GET /api/v1/properties/{id}/leases
pub async fn leases(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Lease>>>> {
    PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Property", id))?;
    let leases = LeaseRepo::list_by_property(&state.pool, id).await?;
    Ok(Json(DataResponse { data: leases }))
}

/// POST /api/v1/properties
///
/// Geocodes the address when no usable coordinates are supplied.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePropertyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PropertyWithLocation>>)> {
    input.validate()?;
    let property = input.to_property()?;
    let supplied = input.supplied_coordinates()?;
    auth.ensure_self(&input.manager_clerk_id)?;

    ManagerRepo::find_by_clerk_id(&state.pool, &input.manager_clerk_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Manager", &input.manager_clerk_id))?;

    let coordinates = match supplied {
        Some(coordinates) => coordinates,
        None => state
            .geocoder
            .geocode(&input.geocode_query())
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Could not find coordinates for address '{}, {}'",
                    input.address, input.city
                ))
            })?,
    };

    let location = CreateLocation {
        address: input.address,
        city: input.city,
        state: input.state,
        country: input.country,
        postal_code: input.postal_code,
        coordinates,
    };
    let created = PropertyRepo::create(&state.pool, &location, &property).await?;

    tracing::info!(
        property_id = created.property.id,
        clerk_id = %created.property.manager_clerk_id,
        "Property created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
