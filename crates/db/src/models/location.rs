//! Location entity model and DTOs.

use leasehold_core::geo::Coordinates;
use leasehold_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `locations` table with the geography point unpacked.
///
/// Selected as `loc_id` so it can be flattened next to a property row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    #[sqlx(rename = "loc_id")]
    pub id: DbId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// DTO for inserting a location.
#[derive(Debug, Clone)]
pub struct CreateLocation {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: Coordinates,
}
