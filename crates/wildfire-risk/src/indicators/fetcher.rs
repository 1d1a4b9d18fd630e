use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::source::{FetchError, IndicatorSource};
use super::window::LookbackWindows;
use super::{
    GeoPoint, IndicatorKind, IndicatorSet, PrecipitationInput, ReadingPair, TemperatureInput,
};

/// Knobs controlling how indicators are gathered for a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchSettings {
    pub per_fetch_timeout: Duration,
    pub fire_lookback_years: u8,
    /// Sample only the current temperature and pair it with itself. The
    /// temperature factor then always lands on the neutral midpoint.
    pub simplified_temperature: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            per_fetch_timeout: Duration::from_secs(30),
            fire_lookback_years: 5,
            simplified_temperature: false,
        }
    }
}

/// Gathers the five indicators concurrently. A slow or failing dataset only
/// empties its own slot.
#[derive(Clone)]
pub struct IndicatorFetcher {
    source: Arc<dyn IndicatorSource>,
    settings: FetchSettings,
}

impl std::fmt::Debug for IndicatorFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorFetcher")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl IndicatorFetcher {
    pub fn new(source: Arc<dyn IndicatorSource>, settings: FetchSettings) -> Self {
        Self { source, settings }
    }

    pub async fn fetch(&self, point: GeoPoint, today: NaiveDate) -> IndicatorSet {
        let windows = LookbackWindows::anchored(today, self.settings.fire_lookback_years);
        let limit = self.settings.per_fetch_timeout;
        let source = self.source.as_ref();

        let (fire_count, vegetation_index, temperature, precipitation, elevation_m) = tokio::join!(
            guarded(
                IndicatorKind::Fire,
                limit,
                source.fire_count(point, &windows)
            ),
            guarded(
                IndicatorKind::Vegetation,
                limit,
                source.vegetation_index(point, &windows)
            ),
            guarded(
                IndicatorKind::Temperature,
                limit,
                self.fetch_temperature(point, &windows)
            ),
            guarded(
                IndicatorKind::Precipitation,
                limit,
                source.precipitation(point, &windows)
            ),
            guarded(
                IndicatorKind::Elevation,
                limit,
                source.elevation(point, &windows)
            ),
        );

        let indicators = IndicatorSet {
            fire_count,
            vegetation_index,
            temperature: temperature.map(TemperatureInput::Readings),
            precipitation: precipitation.map(PrecipitationInput::Readings),
            elevation_m,
        };

        let available = IndicatorKind::ordered()
            .into_iter()
            .filter(|kind| indicators.is_available(*kind))
            .count();
        debug!(
            lat = point.latitude,
            lon = point.longitude,
            available,
            "indicator fetch complete"
        );

        indicators
    }

    async fn fetch_temperature(
        &self,
        point: GeoPoint,
        windows: &LookbackWindows,
    ) -> Result<Option<ReadingPair>, FetchError> {
        if self.settings.simplified_temperature {
            let current = self.source.current_temperature(point, windows).await?;
            Ok(current.map(ReadingPair::current_only))
        } else {
            self.source.temperature(point, windows).await
        }
    }
}

async fn guarded<T, F>(kind: IndicatorKind, limit: Duration, fetch: F) -> Option<T>
where
    F: Future<Output = Result<Option<T>, FetchError>>,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(Ok(Some(value))) => Some(value),
        Ok(Ok(None)) => {
            debug!(indicator = kind.key(), "indicator unavailable for point");
            None
        }
        Ok(Err(err)) => {
            warn!(indicator = kind.key(), error = %err, "indicator fetch failed");
            None
        }
        Err(_) => {
            let err = FetchError::TimedOut {
                kind,
                timeout: limit,
            };
            warn!(indicator = kind.key(), error = %err, "indicator fetch timed out");
            None
        }
    }
}
