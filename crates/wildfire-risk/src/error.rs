use crate::assessment::ReportServiceError;
use crate::config::ConfigError;
use crate::geocode::GeocodeError;
use crate::report::ReportError;
use crate::scoring::ScoringError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    HttpClient(reqwest::Error),
    InvalidBody(JsonRejection),
    Report(ReportServiceError),
    Scoring(ScoringError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Report(err) => match err {
                ReportServiceError::MissingAddress | ReportServiceError::InvalidCoordinates(_) => {
                    StatusCode::BAD_REQUEST
                }
                ReportServiceError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
                ReportServiceError::Geocoding(GeocodeError::Unavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ReportServiceError::Geocoding(GeocodeError::Parse(_))
                | ReportServiceError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::HttpClient(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing summary; the underlying cause goes into `details`.
    fn summary(&self) -> String {
        match self {
            AppError::Report(err) => match err {
                ReportServiceError::MissingAddress => "No address provided.".to_string(),
                ReportServiceError::InvalidCoordinates(_) => {
                    "Invalid coordinate values.".to_string()
                }
                ReportServiceError::LocationNotFound { .. } => {
                    "Could not find location for that address.".to_string()
                }
                ReportServiceError::Geocoding(GeocodeError::Unavailable(_)) => {
                    "Geocoding service is unavailable.".to_string()
                }
                ReportServiceError::Geocoding(GeocodeError::Parse(_)) => {
                    "An unknown geocoding error occurred.".to_string()
                }
                ReportServiceError::Report(_) => "Failed to generate AI risk report.".to_string(),
            },
            AppError::InvalidBody(_) => "Invalid JSON in request body.".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::HttpClient(err) => write!(f, "http client error: {}", err),
            AppError::InvalidBody(err) => write!(f, "invalid request body: {}", err),
            AppError::Report(err) => write!(f, "risk report error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::HttpClient(err) => Some(err),
            AppError::InvalidBody(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Scoring(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Report(ReportServiceError::Report(ReportError::NonJson { excerpt })) => {
                json!({
                    "error": self.summary(),
                    "details": "AI model returned non-JSON output",
                    "raw_response": excerpt,
                })
            }
            AppError::Report(ReportServiceError::Report(ReportError::Schema {
                error,
                excerpt,
            })) => json!({
                "error": self.summary(),
                "details": format!("AI model JSON does not match the report format: {error}"),
                "raw_response": excerpt,
            }),
            AppError::Report(ReportServiceError::MissingAddress) => {
                json!({ "error": self.summary() })
            }
            AppError::Report(err) => json!({
                "error": self.summary(),
                "details": err.to_string(),
            }),
            AppError::InvalidBody(rejection) => json!({
                "error": self.summary(),
                "details": rejection.body_text(),
            }),
            _ => json!({ "error": self.summary() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::HttpClient(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidBody(value)
    }
}

impl From<ReportServiceError> for AppError {
    fn from(value: ReportServiceError) -> Self {
        Self::Report(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}
