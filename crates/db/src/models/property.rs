//! Property entity model and DTOs.

use leasehold_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::location::Location;

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub photo_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub property_type: String,
    pub posted_date: Timestamp,
    pub average_rating: f64,
    pub number_of_reviews: i32,
    pub location_id: DbId,
    pub manager_clerk_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A property joined with its location.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyWithLocation {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    #[sqlx(flatten)]
    pub location: Location,
}

/// DTO for inserting a property. Vocabulary fields must already be canonical.
#[derive(Debug, Clone)]
pub struct CreateProperty {
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub photo_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub property_type: String,
    pub manager_clerk_id: String,
}
