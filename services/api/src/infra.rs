use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};
use wildfire_risk::assessment::{ReportServiceError, RiskReportService, WildfireAssessor};
use wildfire_risk::config::AppConfig;
use wildfire_risk::error::AppError;
use wildfire_risk::geocode::NominatimGeocoder;
use wildfire_risk::indicators::{HttpIndicatorSource, IndicatorFetcher};
use wildfire_risk::report::GeminiClient;
use wildfire_risk::scoring::RiskEngine;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the report model, geocoder and (when configured) the indicator
/// service into one shared report service.
pub(crate) fn build_report_service(
    config: &AppConfig,
    engine: RiskEngine,
) -> Result<RiskReportService, AppError> {
    let api_key = config.report_model.require_api_key()?;
    let generator = GeminiClient::new(
        api_key,
        config.report_model.model.clone(),
        config.report_model.timeout(),
    )
    .map_err(ReportServiceError::from)?;

    let geocoder = NominatimGeocoder::new(
        config.geocoder.base_url.clone(),
        &config.geocoder.user_agent,
        config.geocoder.timeout(),
    )
    .map_err(ReportServiceError::from)?;

    let assessor = match &config.indicators.base_url {
        Some(base_url) => {
            let settings = config.indicators.fetch_settings();
            let source = HttpIndicatorSource::new(base_url.clone(), settings.per_fetch_timeout)?;
            info!(%base_url, "indicator service configured, wildfire scores are data-driven");
            let fetcher = IndicatorFetcher::new(Arc::new(source), settings);
            Some(WildfireAssessor::new(fetcher, engine))
        }
        None => {
            warn!("INDICATOR_SERVICE_URL not set, wildfire scores come from the report model");
            None
        }
    };

    info!(model = generator.model(), "report model configured");
    Ok(RiskReportService::new(
        assessor,
        Arc::new(generator),
        Arc::new(geocoder),
    ))
}
