//! Property search parameters and filter parsing.
//!
//! Query strings arrive as loosely-typed text. [`PropertyFilter::from_params`]
//! turns them into a typed filter, silently dropping any value that fails to
//! parse: a malformed `priceMin` behaves as if it was never sent rather than
//! failing the request. The repository layer turns the typed filter into
//! parameterised SQL.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::catalog::{amenity_search_terms, validate_property_type};
use crate::geo::Coordinates;
use crate::types::{DbId, Timestamp};

/// Fixed radius for coordinate searches, in metres (1000 km).
pub const SEARCH_RADIUS_METERS: f64 = 1_000_000.0;

/// Sentinel value meaning "no filter" for categorical parameters.
const ANY: &str = "any";

/// Raw `GET /properties` query parameters, exactly as sent by clients.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchParams {
    pub favorite_ids: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub property_type: Option<String>,
    pub square_feet_min: Option<String>,
    pub square_feet_max: Option<String>,
    pub amenities: Option<String>,
    pub available_from: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub location: Option<String>,
}

/// Where to look: a geodetic radius around a point, or a text match.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFilter {
    Near(Coordinates),
    Text(String),
}

/// Typed property filter. Every `Some` field is ANDed into the query.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropertyFilter {
    pub ids: Option<Vec<DbId>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub beds_min: Option<i32>,
    pub baths_min: Option<f64>,
    pub square_feet_min: Option<i32>,
    pub square_feet_max: Option<i32>,
    pub property_type: Option<&'static str>,
    /// Canonical (or passed-through) amenity names; matches ANY.
    pub amenities: Option<Vec<String>>,
    pub available_from: Option<Timestamp>,
    pub location: Option<LocationFilter>,
}

impl PropertyFilter {
    /// Build a filter from raw parameters, dropping anything malformed.
    pub fn from_params(params: &PropertySearchParams) -> Self {
        let ids = params.favorite_ids.as_deref().and_then(parse_id_list);

        let property_type = non_any(params.property_type.as_deref())
            .and_then(|t| validate_property_type(t).ok());

        let amenities = non_any(params.amenities.as_deref())
            .map(amenity_search_terms)
            .filter(|terms| !terms.is_empty());

        let location = parse_coordinates(params.latitude.as_deref(), params.longitude.as_deref())
            .map(LocationFilter::Near)
            .or_else(|| {
                params
                    .location
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| LocationFilter::Text(s.to_string()))
            });

        Self {
            ids,
            price_min: parse_number(params.price_min.as_deref()),
            price_max: parse_number(params.price_max.as_deref()),
            beds_min: parse_number(non_any(params.beds.as_deref())),
            baths_min: parse_number(non_any(params.baths.as_deref())),
            square_feet_min: parse_number(params.square_feet_min.as_deref()),
            square_feet_max: parse_number(params.square_feet_max.as_deref()),
            property_type,
            amenities,
            available_from: non_any(params.available_from.as_deref()).and_then(parse_date),
            location,
        }
    }
}

fn non_any(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ANY))
}

/// Parse a finite number, ignoring blanks and garbage.
fn parse_number<T>(value: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + Into<f64> + Copy,
{
    value
        .map(str::trim)
        .and_then(|v| v.parse::<T>().ok())
        .filter(|n| Into::<f64>::into(*n).is_finite())
}

/// Parse a comma-separated id list; malformed entries are skipped.
fn parse_id_list(raw: &str) -> Option<Vec<DbId>> {
    let ids: Vec<DbId> = raw
        .split(',')
        .filter_map(|part| part.trim().parse::<DbId>().ok())
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Accept either a calendar date (`2025-06-01`, midnight UTC) or RFC 3339.
fn parse_date(raw: &str) -> Option<Timestamp> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Both coordinates must parse, be in range, and be non-zero.
fn parse_coordinates(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let latitude: f64 = parse_number(lat)?;
    let longitude: f64 = parse_number(lng)?;
    let coordinates = Coordinates::new(latitude, longitude).ok()?;
    (!coordinates.is_unset()).then_some(coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PropertySearchParams {
        PropertySearchParams::default()
    }

    #[test]
    fn empty_params_produce_empty_filter() {
        assert_eq!(PropertyFilter::from_params(&params()), PropertyFilter::default());
    }

    #[test]
    fn numeric_filters_parse() {
        let p = PropertySearchParams {
            price_min: Some("500".into()),
            price_max: Some("1000".into()),
            beds: Some("2".into()),
            baths: Some("1.5".into()),
            ..params()
        };
        let f = PropertyFilter::from_params(&p);
        assert_eq!(f.price_min, Some(500.0));
        assert_eq!(f.price_max, Some(1000.0));
        assert_eq!(f.beds_min, Some(2));
        assert_eq!(f.baths_min, Some(1.5));
    }

    #[test]
    fn malformed_values_are_dropped() {
        let p = PropertySearchParams {
            price_min: Some("cheap".into()),
            beds: Some("two".into()),
            square_feet_max: Some("NaN".into()),
            available_from: Some("not-a-date".into()),
            favorite_ids: Some("a,b".into()),
            property_type: Some("Castle".into()),
            ..params()
        };
        assert_eq!(PropertyFilter::from_params(&p), PropertyFilter::default());
    }

    #[test]
    fn any_means_no_filter() {
        let p = PropertySearchParams {
            beds: Some("any".into()),
            baths: Some("any".into()),
            property_type: Some("any".into()),
            amenities: Some("any".into()),
            available_from: Some("any".into()),
            ..params()
        };
        assert_eq!(PropertyFilter::from_params(&p), PropertyFilter::default());
    }

    #[test]
    fn favorite_ids_skip_bad_entries() {
        let p = PropertySearchParams {
            favorite_ids: Some("1, 2,x,3".into()),
            ..params()
        };
        assert_eq!(PropertyFilter::from_params(&p).ids, Some(vec![1, 2, 3]));
    }

    #[test]
    fn amenities_are_normalized() {
        let p = PropertySearchParams {
            amenities: Some("wifi,ac".into()),
            ..params()
        };
        assert_eq!(
            PropertyFilter::from_params(&p).amenities,
            Some(vec!["WiFi".to_string(), "AirConditioning".to_string()])
        );
    }

    #[test]
    fn coordinates_take_precedence_over_text() {
        let p = PropertySearchParams {
            latitude: Some("34.05".into()),
            longitude: Some("-118.24".into()),
            location: Some("Los Angeles".into()),
            ..params()
        };
        let f = PropertyFilter::from_params(&p);
        assert!(matches!(f.location, Some(LocationFilter::Near(c)) if c.latitude == 34.05));
    }

    #[test]
    fn zero_or_out_of_range_coordinates_fall_back_to_text() {
        for (lat, lng) in [("0", "-118.24"), ("95", "10"), ("10", "abc")] {
            let p = PropertySearchParams {
                latitude: Some(lat.into()),
                longitude: Some(lng.into()),
                location: Some(" Accra ".into()),
                ..params()
            };
            assert_eq!(
                PropertyFilter::from_params(&p).location,
                Some(LocationFilter::Text("Accra".into()))
            );
        }
    }

    #[test]
    fn available_from_accepts_date_and_rfc3339() {
        let date = parse_date("2025-06-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2025-06-01T00:00:00+00:00");
        let ts = parse_date("2025-06-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-06-01T10:30:00+00:00");
    }
}
