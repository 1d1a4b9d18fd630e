//! Environmental indicators sampled around a property and the collaborators
//! that fetch them.

pub mod fetcher;
pub mod source;
pub mod window;

pub use fetcher::{FetchSettings, IndicatorFetcher};
pub use source::{FetchError, HttpIndicatorSource, IndicatorSource};
pub use window::{DateRange, LookbackWindows};

use serde::{Deserialize, Serialize};

use crate::scoring::ScoringError;

/// The five indicators feeding the composite score, in fixed factor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Fire,
    Vegetation,
    Temperature,
    Precipitation,
    Elevation,
}

impl IndicatorKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Fire,
            Self::Vegetation,
            Self::Temperature,
            Self::Precipitation,
            Self::Elevation,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fire => "Historical fire",
            Self::Vegetation => "Vegetation",
            Self::Temperature => "Temperature",
            Self::Precipitation => "Precipitation",
            Self::Elevation => "Elevation",
        }
    }

    /// Stable identifier used in URLs, metrics and JSON maps.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Vegetation => "vegetation",
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
            Self::Elevation => "elevation",
        }
    }
}

/// A WGS84 coordinate for the property being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("coordinates ({latitude}, {longitude}) are outside the valid WGS84 range")]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current reading alongside its historical baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingPair {
    pub current: f64,
    pub historical: f64,
}

impl ReadingPair {
    pub fn new(current: f64, historical: f64) -> Self {
        Self {
            current,
            historical,
        }
    }

    /// Pair produced by the simplified fetch path, which only samples the
    /// current reading. The derived anomaly is always zero.
    pub fn current_only(current: f64) -> Self {
        Self::new(current, current)
    }
}

/// Temperature slot: either a precomputed anomaly or the raw readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemperatureInput {
    Anomaly(f64),
    Readings(ReadingPair),
}

impl TemperatureInput {
    /// Degrees Celsius above (positive) or below the historical baseline.
    pub fn anomaly_c(&self) -> f64 {
        match self {
            Self::Anomaly(value) => *value,
            Self::Readings(pair) => pair.current - pair.historical,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::Anomaly(value) => value.is_finite(),
            Self::Readings(pair) => pair.current.is_finite() && pair.historical.is_finite(),
        }
    }
}

/// Precipitation slot: either a precomputed deficit percentage or the raw
/// current / historical totals in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrecipitationInput {
    DeficitPercent(f64),
    Readings(ReadingPair),
}

impl PrecipitationInput {
    /// Shortfall against the baseline as a percentage. A non-positive
    /// baseline yields no deficit.
    pub fn deficit_percent(&self) -> f64 {
        match self {
            Self::DeficitPercent(value) => *value,
            Self::Readings(pair) if pair.historical > 0.0 => {
                (pair.historical - pair.current) / pair.historical * 100.0
            }
            Self::Readings(_) => 0.0,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::DeficitPercent(value) => value.is_finite(),
            Self::Readings(pair) => pair.current.is_finite() && pair.historical.is_finite(),
        }
    }
}

/// Whatever subset of indicators arrived for a point. Absent slots are
/// scored with the neutral default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(default, alias = "fireCount")]
    pub fire_count: Option<u32>,
    #[serde(default, alias = "vegetationIndex")]
    pub vegetation_index: Option<f64>,
    #[serde(default, alias = "temperatureAnomalyC")]
    pub temperature: Option<TemperatureInput>,
    #[serde(default, alias = "precipitationDeficitPercent")]
    pub precipitation: Option<PrecipitationInput>,
    #[serde(default, alias = "elevationMeters")]
    pub elevation_m: Option<f64>,
}

impl IndicatorSet {
    pub fn is_available(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::Fire => self.fire_count.is_some(),
            IndicatorKind::Vegetation => self.vegetation_index.is_some(),
            IndicatorKind::Temperature => self.temperature.is_some(),
            IndicatorKind::Precipitation => self.precipitation.is_some(),
            IndicatorKind::Elevation => self.elevation_m.is_some(),
        }
    }

    /// Rejects values no scoring curve can place (NaN or infinite).
    pub fn validate(&self) -> Result<(), ScoringError> {
        let invalid = |kind: IndicatorKind, detail: String| ScoringError::InvalidIndicator {
            kind,
            detail,
        };

        if let Some(value) = self.vegetation_index {
            if !value.is_finite() {
                return Err(invalid(
                    IndicatorKind::Vegetation,
                    format!("vegetation index {value} is not finite"),
                ));
            }
        }
        if let Some(input) = &self.temperature {
            if !input.is_finite() {
                return Err(invalid(
                    IndicatorKind::Temperature,
                    "temperature readings must be finite".to_string(),
                ));
            }
        }
        if let Some(input) = &self.precipitation {
            if !input.is_finite() {
                return Err(invalid(
                    IndicatorKind::Precipitation,
                    "precipitation readings must be finite".to_string(),
                ));
            }
        }
        if let Some(value) = self.elevation_m {
            if !value.is_finite() {
                return Err(invalid(
                    IndicatorKind::Elevation,
                    format!("elevation {value} is not finite"),
                ));
            }
        }

        Ok(())
    }
}
