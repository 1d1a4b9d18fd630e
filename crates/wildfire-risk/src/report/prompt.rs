use std::fmt::Write as _;

use super::HAZARD_TYPES;
use crate::indicators::GeoPoint;
use crate::scoring::RiskAssessment;

/// Builds the underwriting prompt. When a data-driven wildfire assessment is
/// available the model is told to reuse its score verbatim.
pub fn build_prompt(address: &str, point: GeoPoint, wildfire: Option<&RiskAssessment>) -> String {
    let GeoPoint {
        latitude,
        longitude,
    } = point;
    let mut prompt = String::new();

    prompt.push_str(
        "You are a geospatial risk analyst supporting insurance underwriting. You reason over \
         satellite imagery, Earth observation data, climate models, historical disaster records \
         and regional climate patterns.\n\n",
    );
    prompt.push_str(
        "Produce a data-driven multi-factor risk report for the location below, considering \
         regional climate patterns and history, terrain, known disasters in the area, climate \
         change projections and local environmental factors.\n\n",
    );
    prompt.push_str("Scoring guidelines:\n");
    prompt.push_str("- Scores range from 0 (minimal risk) to 10 (extreme risk).\n");
    prompt.push_str(
        "- Reflect the region's real climate: arid and semi-arid regions carry higher drought \
         risk, tropical and coastal regions higher storm and flood risk, Mediterranean-type \
         climates higher wildfire risk.\n",
    );
    prompt.push_str("- Be realistic rather than conservative.\n\n");

    let _ = writeln!(prompt, "Address: {address}");
    let _ = writeln!(prompt, "Latitude: {latitude}");
    let _ = writeln!(prompt, "Longitude: {longitude}");

    if let Some(assessment) = wildfire {
        let sources: Vec<&str> = assessment
            .data_sources
            .available()
            .into_iter()
            .map(|kind| kind.key())
            .collect();
        let sources = if sources.is_empty() {
            "none".to_string()
        } else {
            sources.join(", ")
        };

        prompt.push_str("\nA measured wildfire assessment is available for this location:\n");
        let _ = writeln!(prompt, "- Wildfire risk score: {}/10", assessment.score);
        let _ = writeln!(prompt, "- Explanation: {}", assessment.explanation);
        let _ = writeln!(prompt, "- Data sources available: {sources}");
        let _ = writeln!(
            prompt,
            "You MUST use this exact wildfire score ({}) in your response. You may expand on \
             the explanation.",
            assessment.score
        );
    }

    prompt.push_str("\nReturn only a JSON object with this structure:\n");
    let _ = writeln!(
        prompt,
        "{{\"location\": {{\"address\": \"{address}\", \"latitude\": {latitude}, \"longitude\": {longitude}}},"
    );
    prompt.push_str(" \"risk_scores\": [\n");
    let entries: Vec<String> = HAZARD_TYPES
        .iter()
        .map(|hazard| {
            format!(
                "  {{\"risk_type\": \"{hazard}\", \"score\": <number 0-10>, \"explanation\": \"<one sentence on regional {} risk factors>\"}}",
                hazard.to_lowercase()
            )
        })
        .collect();
    prompt.push_str(&entries.join(",\n"));
    prompt.push_str("\n ],\n");
    prompt.push_str(
        " \"overall_summary\": \"<two sentences on the key risks for this property>\",\n",
    );
    prompt.push_str(
        " \"automated_decision\": \"<'APPROVE', 'DENY', or 'FLAG FOR REVIEW' based on overall risk>\"}\n",
    );

    prompt
}
