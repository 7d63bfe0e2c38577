//! Repository for the `locations` table.

use leasehold_core::geo::SRID_WGS84;
use sqlx::PgConnection;

use crate::models::location::{CreateLocation, Location};

/// Unqualified columns with the geography point unpacked.
pub(crate) const RETURNING_COLUMNS: &str = "id AS loc_id, address, city, state, country, \
    postal_code, ST_Y(coordinates::geometry) AS latitude, ST_X(coordinates::geometry) AS longitude";

/// Columns for queries that alias `locations` as `l`.
pub(crate) const JOINED_COLUMNS: &str = "l.id AS loc_id, l.address, l.city, l.state, l.country, \
    l.postal_code, ST_Y(l.coordinates::geometry) AS latitude, \
    ST_X(l.coordinates::geometry) AS longitude";

pub struct LocationRepo;

impl LocationRepo {
    /// Insert a location inside the caller's transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (address, city, state, country, postal_code, coordinates)
             VALUES ($1, $2, $3, $4, $5, ST_SetSRID(ST_MakePoint($6, $7), {SRID_WGS84})::geography)
             RETURNING {RETURNING_COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.country)
            .bind(&input.postal_code)
            .bind(input.coordinates.longitude)
            .bind(input.coordinates.latitude)
            .fetch_one(conn)
            .await
    }
}
