//! End-to-end pipeline: resolve the property, measure wildfire risk, and
//! blend it into the generated multi-hazard report.

mod service;

pub use service::{ReportRequest, ReportServiceError, RiskReportService};

use chrono::NaiveDate;

use crate::indicators::{GeoPoint, IndicatorFetcher};
use crate::scoring::{RiskAssessment, RiskEngine, ScoringError};

/// Fetches indicators for a point and scores them.
#[derive(Debug, Clone)]
pub struct WildfireAssessor {
    fetcher: IndicatorFetcher,
    engine: RiskEngine,
}

impl WildfireAssessor {
    pub fn new(fetcher: IndicatorFetcher, engine: RiskEngine) -> Self {
        Self { fetcher, engine }
    }

    pub async fn assess(
        &self,
        point: GeoPoint,
        today: NaiveDate,
    ) -> Result<RiskAssessment, ScoringError> {
        let indicators = self.fetcher.fetch(point, today).await;
        self.engine.aggregate(&indicators)
    }
}
