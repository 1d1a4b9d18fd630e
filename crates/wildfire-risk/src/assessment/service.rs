use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::WildfireAssessor;
use crate::geocode::{GeocodeError, Geocoder};
use crate::indicators::{GeoPoint, InvalidCoordinates};
use crate::report::{
    apply_wildfire_assessment, build_prompt, decode_report, normalize_for_display, HazardReport,
    ReportError, ReportGenerator,
};
use crate::scoring::RiskAssessment;

/// Caller-supplied property. Coordinates win over geocoding when both are
/// present. A missing address decodes as empty and is rejected by
/// [`RiskReportService::report`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub longitude: Option<f64>,
}

/// Form posts send coordinates as strings; accept either spelling.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coordinate {
        Number(f64),
        Text(String),
    }

    match Option::<Coordinate>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Coordinate::Number(value)) => Ok(Some(value)),
        Some(Coordinate::Text(raw)) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate value '{raw}'"))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("no address provided")]
    MissingAddress,
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),
    #[error("could not find a location for '{address}'")]
    LocationNotFound { address: String },
    #[error(transparent)]
    Geocoding(#[from] GeocodeError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Composes geocoding, the optional wildfire assessor and the report model.
pub struct RiskReportService {
    assessor: Option<WildfireAssessor>,
    generator: Arc<dyn ReportGenerator>,
    geocoder: Arc<dyn Geocoder>,
}

impl RiskReportService {
    pub fn new(
        assessor: Option<WildfireAssessor>,
        generator: Arc<dyn ReportGenerator>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            assessor,
            generator,
            geocoder,
        }
    }

    pub fn has_assessor(&self) -> bool {
        self.assessor.is_some()
    }

    pub async fn report(
        &self,
        request: ReportRequest,
        today: NaiveDate,
    ) -> Result<HazardReport, ReportServiceError> {
        let point = self.resolve(&request).await?;
        let wildfire = self.wildfire_assessment(point, today).await;

        let prompt = build_prompt(&request.address, point, wildfire.as_ref());
        let text = self.generator.generate(&prompt).await?;
        let payload = decode_report(&text)?;
        if payload.was_extracted() {
            debug!("report model wrapped its JSON in prose");
        }
        let mut report = payload.into_report();

        if let Some(assessment) = &wildfire {
            if !apply_wildfire_assessment(&mut report, assessment) {
                warn!(
                    measured_score = assessment.score,
                    "report has no wildfire entry, measured score dropped"
                );
            }
        }
        normalize_for_display(&mut report);

        info!(address = %request.address, "risk report generated");
        Ok(report)
    }

    async fn resolve(&self, request: &ReportRequest) -> Result<GeoPoint, ReportServiceError> {
        if request.address.trim().is_empty() {
            return Err(ReportServiceError::MissingAddress);
        }

        if let (Some(latitude), Some(longitude)) = (request.latitude, request.longitude) {
            return Ok(GeoPoint::new(latitude, longitude)?);
        }

        info!(address = %request.address, "coordinates not provided, geocoding address");
        match self.geocoder.geocode(&request.address).await? {
            Some(location) => {
                info!(
                    address = %request.address,
                    resolved = location.display_name.as_deref().unwrap_or("<unnamed>"),
                    lat = location.point.latitude,
                    lon = location.point.longitude,
                    "address geocoded"
                );
                Ok(location.point)
            }
            None => Err(ReportServiceError::LocationNotFound {
                address: request.address.clone(),
            }),
        }
    }

    /// Any failure here falls back to a narrative-only wildfire score.
    async fn wildfire_assessment(&self, point: GeoPoint, today: NaiveDate) -> Option<RiskAssessment> {
        let assessor = self.assessor.as_ref()?;
        match assessor.assess(point, today).await {
            Ok(assessment) => {
                info!(score = assessment.score, "wildfire risk assessed from indicators");
                Some(assessment)
            }
            Err(err) => {
                warn!(error = %err, "wildfire assessment failed, using model narrative only");
                None
            }
        }
    }
}
