//! Address to coordinate lookup.

pub mod nominatim;

pub use nominatim::NominatimGeocoder;

use crate::indicators::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub point: GeoPoint,
    pub display_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding service is unavailable: {0}")]
    Unavailable(String),
    #[error("geocoding response could not be parsed: {0}")]
    Parse(String),
}

#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service answered but found no match.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, GeocodeError>;
}
