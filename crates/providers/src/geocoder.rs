//! Forward geocoding of postal addresses via a Nominatim-compatible service.

use async_trait::async_trait;
use leasehold_core::geo::Coordinates;
use reqwest::Url;
use serde::Deserialize;

use crate::PROVIDER_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "Leasehold/0.1";

/// Errors from the geocoding layer.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected geocoder response: {0}")]
    InvalidResponse(String),

    #[error("Invalid geocoder configuration: {0}")]
    Config(String),
}

/// Structured address to resolve.
#[derive(Debug, Clone, Default)]
pub struct GeocodeQuery {
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

/// Resolves an address to a point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service found no match.
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>, GeocodeError>;
}

/// One search hit. Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidResponse(format!("bad coordinate '{raw}'")))
        };
        Coordinates::new(parse(&self.lat)?, parse(&self.lon)?)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
    }
}

/// Nominatim `/search` client.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: Url,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, GeocodeError> {
        let mut search_url =
            Url::parse(base_url).map_err(|e| GeocodeError::Config(e.to_string()))?;
        search_url
            .path_segments_mut()
            .map_err(|_| GeocodeError::Config(format!("{base_url} cannot be a base URL")))?
            .pop_if_empty()
            .push("search");

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(PROVIDER_TIMEOUT)
            .build()?;
        Ok(Self { client, search_url })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("street", query.street.as_str()),
                ("city", query.city.as_str()),
                ("country", query.country.as_str()),
                ("postalcode", query.postal_code.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        let found = places.first().map(Place::coordinates).transpose()?;
        tracing::debug!(city = %query.city, found = found.is_some(), "Geocoded address");
        Ok(found)
    }
}
