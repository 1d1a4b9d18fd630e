//! Presentation rescale from the 0-10 risk scale to 0-100.

pub const DISPLAY_MAX: f64 = 100.0;

/// Converts a 0-10 score to the 0-100 display scale, rounded to one decimal.
pub fn display_score(score: f64) -> f64 {
    round_to_tenth(score * 10.0).clamp(0.0, DISPLAY_MAX)
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
