use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::window::{DateRange, LookbackWindows};
use super::{GeoPoint, IndicatorKind, ReadingPair};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{kind:?} request failed: {message}")]
    Transport {
        kind: IndicatorKind,
        message: String,
    },
    #[error("{kind:?} request returned HTTP {status}")]
    Status { kind: IndicatorKind, status: u16 },
    #[error("{kind:?} response could not be decoded: {message}")]
    Decode {
        kind: IndicatorKind,
        message: String,
    },
    #[error("{kind:?} fetch exceeded {timeout:?}")]
    TimedOut {
        kind: IndicatorKind,
        timeout: Duration,
    },
}

/// Remote dataset access for a single point. Each method is independent:
/// `Ok(None)` means the dataset had no value for the point.
#[async_trait::async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn fire_count(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<u32>, FetchError>;

    async fn vegetation_index(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<f64>, FetchError>;

    async fn temperature(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<ReadingPair>, FetchError>;

    /// Latest surface temperature without a baseline, used by the
    /// simplified fetch mode.
    async fn current_temperature(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<f64>, FetchError> {
        Ok(self
            .temperature(point, windows)
            .await?
            .map(|pair| pair.current))
    }

    async fn precipitation(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<ReadingPair>, FetchError>;

    async fn elevation(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<f64>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct IndicatorEnvelope<T> {
    value: Option<T>,
}

/// Client for an HTTP indicator service that wraps the satellite datasets.
///
/// The client is the session: construct it once and share it between
/// requests instead of relying on process-wide initialisation.
#[derive(Debug, Clone)]
pub struct HttpIndicatorSource {
    client: reqwest::Client,
    base_url: String,
    buffer_km: f64,
    fire_buffer_km: f64,
}

impl HttpIndicatorSource {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            buffer_km: 5.0,
            fire_buffer_km: 10.0,
        }
    }

    fn endpoint(&self, kind: IndicatorKind) -> String {
        format!("{}/v1/indicators/{}", self.base_url, kind.key())
    }

    async fn query<T: DeserializeOwned>(
        &self,
        kind: IndicatorKind,
        point: GeoPoint,
        buffer_km: f64,
        current: Option<DateRange>,
        baseline: Option<DateRange>,
    ) -> Result<Option<T>, FetchError> {
        let mut params = vec![
            ("lat", point.latitude.to_string()),
            ("lon", point.longitude.to_string()),
            ("buffer_km", buffer_km.to_string()),
        ];
        if let Some(range) = current {
            params.push(("start", range.start.to_string()));
            params.push(("end", range.end.to_string()));
        }
        if let Some(range) = baseline {
            params.push(("baseline_start", range.start.to_string()));
            params.push(("baseline_end", range.end.to_string()));
        }

        debug!(
            indicator = kind.key(),
            lat = point.latitude,
            lon = point.longitude,
            "requesting indicator"
        );

        let response = self
            .client
            .get(self.endpoint(kind))
            .query(&params)
            .send()
            .await
            .map_err(|err| FetchError::Transport {
                kind,
                message: err.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        let envelope: IndicatorEnvelope<T> =
            response.json().await.map_err(|err| FetchError::Decode {
                kind,
                message: err.to_string(),
            })?;
        Ok(envelope.value)
    }
}

#[async_trait::async_trait]
impl IndicatorSource for HttpIndicatorSource {
    async fn fire_count(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<u32>, FetchError> {
        self.query(
            IndicatorKind::Fire,
            point,
            self.fire_buffer_km,
            Some(windows.fire_history),
            None,
        )
        .await
    }

    async fn vegetation_index(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<f64>, FetchError> {
        self.query(
            IndicatorKind::Vegetation,
            point,
            self.buffer_km,
            Some(windows.vegetation),
            None,
        )
        .await
    }

    async fn temperature(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<ReadingPair>, FetchError> {
        self.query(
            IndicatorKind::Temperature,
            point,
            self.buffer_km,
            Some(windows.temperature_current),
            Some(windows.temperature_baseline),
        )
        .await
    }

    async fn current_temperature(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<f64>, FetchError> {
        self.query(
            IndicatorKind::Temperature,
            point,
            self.buffer_km,
            Some(windows.temperature_current),
            None,
        )
        .await
    }

    async fn precipitation(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<ReadingPair>, FetchError> {
        self.query(
            IndicatorKind::Precipitation,
            point,
            self.buffer_km,
            Some(windows.precipitation_current),
            Some(windows.precipitation_baseline),
        )
        .await
    }

    async fn elevation(
        &self,
        point: GeoPoint,
        _windows: &LookbackWindows,
    ) -> Result<Option<f64>, FetchError> {
        self.query(IndicatorKind::Elevation, point, self.buffer_km, None, None)
            .await
    }
}
