use crate::indicators::{IndicatorSet, PrecipitationInput, TemperatureInput};
use crate::scoring::RiskEngine;

pub(super) fn engine() -> RiskEngine {
    RiskEngine::default()
}

pub(super) fn full_set(
    fire_count: u32,
    vegetation_index: f64,
    anomaly_c: f64,
    deficit_percent: f64,
    elevation_m: f64,
) -> IndicatorSet {
    IndicatorSet {
        fire_count: Some(fire_count),
        vegetation_index: Some(vegetation_index),
        temperature: Some(TemperatureInput::Anomaly(anomaly_c)),
        precipitation: Some(PrecipitationInput::DeficitPercent(deficit_percent)),
        elevation_m: Some(elevation_m),
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
