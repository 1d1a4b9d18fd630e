//! Multi-hazard property report produced by a generative model, and the
//! overlay that pins its wildfire entry to the data-driven score.

pub mod decode;
pub mod gemini;
pub mod overlay;
pub mod prompt;

pub use decode::{decode_report, ReportPayload};
pub use gemini::GeminiClient;
pub use overlay::{apply_wildfire_assessment, normalize_for_display};
pub use prompt::build_prompt;

use serde::{Deserialize, Serialize};

use crate::scoring::DataSources;

/// Hazards the report always covers, in display order.
pub const HAZARD_TYPES: [&str; 4] = ["Flood", "Wildfire", "Storm", "Drought"];

pub const WILDFIRE: &str = "Wildfire";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    #[serde(default)]
    pub location: ReportLocation,
    #[serde(default)]
    pub risk_scores: Vec<HazardScore>,
    #[serde(default)]
    pub overall_summary: String,
    #[serde(default)]
    pub automated_decision: String,
}

impl HazardReport {
    pub fn hazard_mut(&mut self, risk_type: &str) -> Option<&mut HazardScore> {
        self.risk_scores
            .iter_mut()
            .find(|entry| entry.risk_type.eq_ignore_ascii_case(risk_type))
    }
}

/// Location echoed by the model. Models sometimes answer with `lat`/`lon`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportLocation {
    #[serde(default)]
    pub address: String,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardScore {
    pub risk_type: String,
    pub score: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HazardMetadata>,
}

/// Provenance attached when a hazard score came from measured indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardMetadata {
    pub data_driven: bool,
    pub data_sources: DataSources,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report model request failed: {0}")]
    Transport(String),
    #[error("report model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("report model returned no content")]
    EmptyResponse,
    #[error("AI model returned non-JSON output")]
    NonJson { excerpt: String },
    #[error("AI model JSON does not match the report format: {error}")]
    Schema { error: String, excerpt: String },
}

/// Text-generation backend that answers a prompt with a JSON report.
#[async_trait::async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ReportError>;
}
