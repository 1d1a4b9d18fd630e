use crate::cli::ServeArgs;
use crate::infra::{build_report_service, AppState};
use crate::routes::{cors_layer, with_risk_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wildfire_risk::config::AppConfig;
use wildfire_risk::error::AppError;
use wildfire_risk::scoring::RiskEngine;
use wildfire_risk::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = RiskEngine::default();
    let report_service = Arc::new(build_report_service(&config, engine.clone())?);
    info!(
        data_driven_wildfire = report_service.has_assessor(),
        "risk report service assembled"
    );

    let app = with_risk_routes(report_service, engine)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.server.allowed_origins))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "wildfire risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
