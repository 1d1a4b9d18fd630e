use std::time::Duration;

use super::{GeocodeError, GeocodedLocation, Geocoder};
use crate::indicators::GeoPoint;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "wildfire-risk/0.1 (property risk reports)";

/// Nominatim / OpenStreetMap free-form search client. The public instance
/// allows one request per second and requires an identifying user agent.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|err| GeocodeError::Unavailable(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(|err| GeocodeError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Unavailable(format!(
                "Nominatim returned HTTP {status}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| GeocodeError::Parse(err.to_string()))?;
        parse_response(&body)
    }
}

fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let results = body
        .as_array()
        .ok_or_else(|| GeocodeError::Parse("Nominatim response is not an array".to_string()))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let coordinate = |field: &str| {
        first[field]
            .as_str()
            .and_then(|raw| raw.parse::<f64>().ok())
            .ok_or_else(|| GeocodeError::Parse(format!("missing {field} in Nominatim response")))
    };

    let point = GeoPoint::new(coordinate("lat")?, coordinate("lon")?)
        .map_err(|err| GeocodeError::Parse(err.to_string()))?;

    Ok(Some(GeocodedLocation {
        point,
        display_name: first["display_name"].as_str().map(String::from),
    }))
}
