//! Piecewise-linear curves mapping each indicator onto the 0-10 risk scale.

use crate::indicators::{IndicatorKind, IndicatorSet};

/// Sub-score assigned when an indicator could not be fetched.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// A factor's position on the 0-10 scale with a one-sentence rationale.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveScore {
    pub score: f64,
    pub rationale: String,
}

impl CurveScore {
    fn new(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 10.0),
            rationale: rationale.into(),
        }
    }
}

pub fn unavailable(kind: IndicatorKind) -> CurveScore {
    CurveScore::new(NEUTRAL_SCORE, format!("{} data unavailable", kind.label()))
}

pub fn fire_frequency(fire_count: u32) -> CurveScore {
    let n = f64::from(fire_count);
    match fire_count {
        0 => CurveScore::new(0.0, "No historical fires in the region"),
        1..=2 => CurveScore::new(
            2.0 + (n - 1.0) * 2.0,
            format!("{fire_count} historical fire(s) detected"),
        ),
        3..=5 => CurveScore::new(
            5.0 + (n - 3.0),
            format!("{fire_count} historical fires indicate moderate risk"),
        ),
        _ => CurveScore::new(
            (8.0 + (n - 6.0) * 0.5).min(10.0),
            format!("{fire_count} historical fires indicate high risk"),
        ),
    }
}

pub fn vegetation(index: f64) -> CurveScore {
    if index < 0.3 {
        CurveScore::new(index / 0.3 * 3.0, "Low vegetation density")
    } else if index < 0.6 {
        CurveScore::new(
            3.0 + (index - 0.3) / 0.3 * 4.0,
            "Moderate vegetation density",
        )
    } else {
        CurveScore::new(
            7.0 + ((index - 0.6) / 0.4 * 3.0).min(3.0),
            "High vegetation density (high fuel load)",
        )
    }
}

pub fn temperature(anomaly_c: f64) -> CurveScore {
    let below = || format!("Temperature {:.1}°C below average", anomaly_c.abs());
    if anomaly_c <= -5.0 {
        CurveScore::new(0.0, below())
    } else if anomaly_c <= 0.0 {
        // rises from 0 at -5°C to the neutral midpoint at the baseline.
        // Intentionally `5 - ..` rather than the published `5 + (a/-5)*5`,
        // which is not monotone.
        CurveScore::new(5.0 - (anomaly_c / -5.0) * 5.0, below())
    } else if anomaly_c <= 5.0 {
        CurveScore::new(
            5.0 + (anomaly_c / 5.0) * 5.0,
            format!("Temperature {anomaly_c:.1}°C above average"),
        )
    } else {
        CurveScore::new(
            10.0,
            format!("Temperature {anomaly_c:.1}°C above average (high risk)"),
        )
    }
}

pub fn precipitation(deficit_percent: f64) -> CurveScore {
    if deficit_percent <= 0.0 {
        CurveScore::new(0.0, "Precipitation at or above average")
    } else if deficit_percent <= 50.0 {
        CurveScore::new(
            deficit_percent / 50.0 * 7.5,
            format!("{deficit_percent:.0}% precipitation deficit"),
        )
    } else {
        CurveScore::new(
            7.5 + ((deficit_percent - 50.0) / 50.0 * 2.5).min(2.5),
            format!("{deficit_percent:.0}% precipitation deficit (severe drought)"),
        )
    }
}

pub fn elevation(meters: f64) -> CurveScore {
    if meters < 100.0 {
        CurveScore::new(2.0, "Low elevation")
    } else if meters < 500.0 {
        CurveScore::new(
            2.0 + (meters - 100.0) / 400.0 * 6.0,
            format!("Moderate elevation ({meters:.0}m)"),
        )
    } else {
        CurveScore::new(
            8.0 + ((meters - 500.0) / 1000.0 * 2.0).min(2.0),
            format!("High elevation ({meters:.0}m, complex terrain)"),
        )
    }
}

/// Scores one slot of the set, falling back to the neutral default.
pub(crate) fn score_slot(kind: IndicatorKind, indicators: &IndicatorSet) -> CurveScore {
    let scored = match kind {
        IndicatorKind::Fire => indicators.fire_count.map(fire_frequency),
        IndicatorKind::Vegetation => indicators.vegetation_index.map(vegetation),
        IndicatorKind::Temperature => indicators
            .temperature
            .map(|input| temperature(input.anomaly_c())),
        IndicatorKind::Precipitation => indicators
            .precipitation
            .map(|input| precipitation(input.deficit_percent())),
        IndicatorKind::Elevation => indicators.elevation_m.map(elevation),
    };

    scored.unwrap_or_else(|| unavailable(kind))
}
