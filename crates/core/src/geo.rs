//! Geodetic coordinates (WGS84, SRID 4326).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Spatial reference id for WGS84 longitude/latitude.
pub const SRID_WGS84: i32 = 4326;

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "Latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "Longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// `true` for the (0, 0) placeholder clients send when they have no fix.
    pub fn is_unset(&self) -> bool {
        self.latitude == 0.0 || self.longitude == 0.0
    }
}
