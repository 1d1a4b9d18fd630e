use tracing::warn;

use super::{HazardReport, ReportError};

const EXCERPT_CHARS: usize = 500;

/// How a report was recovered from model output.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportPayload {
    /// The whole response was the expected JSON document.
    Structured(HazardReport),
    /// The JSON object had to be cut out of surrounding prose.
    Extracted(HazardReport),
}

impl ReportPayload {
    pub fn into_report(self) -> HazardReport {
        match self {
            Self::Structured(report) | Self::Extracted(report) => report,
        }
    }

    pub fn was_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }
}

/// Decodes a report strictly, falling back to the span between the first
/// `{` and the last `}` when the model wrapped its JSON in other text.
///
/// Well-formed JSON that does not fit the report shape is a
/// [`ReportError::Schema`]; only text without a parseable object is
/// [`ReportError::NonJson`].
pub fn decode_report(text: &str) -> Result<ReportPayload, ReportError> {
    let strict_error = match serde_json::from_str::<HazardReport>(text.trim()) {
        Ok(report) => return Ok(ReportPayload::Structured(report)),
        Err(err) => err,
    };
    if is_json(text.trim()) {
        warn!(error = %strict_error, "model JSON does not match the report shape");
        return Err(schema_mismatch(text, &strict_error));
    }

    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => {
            warn!(error = %strict_error, "no JSON object found in model output");
            return Err(non_json(text));
        }
    };

    match serde_json::from_str::<HazardReport>(candidate) {
        Ok(report) => {
            warn!(error = %strict_error, "report JSON extracted from surrounding text");
            Ok(ReportPayload::Extracted(report))
        }
        Err(err) if is_json(candidate) => {
            warn!(error = %err, "extracted model JSON does not match the report shape");
            Err(schema_mismatch(text, &err))
        }
        Err(err) => {
            warn!(error = %err, "extracted report JSON failed to decode");
            Err(non_json(text))
        }
    }
}

fn is_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

fn schema_mismatch(text: &str, error: &serde_json::Error) -> ReportError {
    ReportError::Schema {
        error: error.to_string(),
        excerpt: excerpt(text),
    }
}

fn non_json(text: &str) -> ReportError {
    ReportError::NonJson {
        excerpt: excerpt(text),
    }
}
