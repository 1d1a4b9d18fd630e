use tracing::{debug, info};

use super::{HazardMetadata, HazardReport, WILDFIRE};
use crate::scoring::scale::DISPLAY_MAX;
use crate::scoring::{display_score, RiskAssessment};

pub const PROVENANCE_MARKER: &str = "(data-driven assessment)";

/// Overwrites the model's wildfire score with the measured assessment.
/// Returns `false` when the report has no wildfire entry.
pub fn apply_wildfire_assessment(report: &mut HazardReport, assessment: &RiskAssessment) -> bool {
    let Some(entry) = report.hazard_mut(WILDFIRE) else {
        debug!("report has no wildfire entry to overlay");
        return false;
    };

    info!(
        model_score = entry.score,
        measured_score = assessment.score,
        "replacing model wildfire score with measured assessment"
    );

    entry.score = assessment.score;
    let base = if assessment.explanation.is_empty() {
        entry.explanation.as_str()
    } else {
        assessment.explanation.as_str()
    };
    entry.explanation = if base.is_empty() {
        PROVENANCE_MARKER.to_string()
    } else {
        format!("{base} {PROVENANCE_MARKER}")
    };
    entry.metadata = Some(HazardMetadata {
        data_driven: assessment.is_data_driven(),
        data_sources: assessment.data_sources,
    });

    true
}

/// Moves every hazard score onto the 0-100 display scale. Scores the model
/// already expressed above 10 are treated as percentages and only clamped.
pub fn normalize_for_display(report: &mut HazardReport) {
    for entry in &mut report.risk_scores {
        if entry.score <= 10.0 {
            entry.score = display_score(entry.score);
        }
        entry.score = entry.score.clamp(0.0, DISPLAY_MAX);
    }
}
