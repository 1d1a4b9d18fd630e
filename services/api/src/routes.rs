use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use wildfire_risk::assessment::{ReportRequest, RiskReportService};
use wildfire_risk::error::AppError;
use wildfire_risk::indicators::IndicatorSet;
use wildfire_risk::report::HazardReport;
use wildfire_risk::scoring::{display_score, RiskAssessment, RiskEngine};

#[derive(Clone)]
pub(crate) struct RiskRoutes {
    service: Arc<RiskReportService>,
    engine: RiskEngine,
}

/// Aggregator output plus its 0-100 display value.
#[derive(Debug, Serialize)]
pub(crate) struct WildfireScoreResponse {
    #[serde(flatten)]
    pub(crate) assessment: RiskAssessment,
    pub(crate) display_score: f64,
}

pub(crate) fn with_risk_routes(service: Arc<RiskReportService>, engine: RiskEngine) -> Router {
    Router::new()
        .route("/api/get-risk-report", post(risk_report_endpoint))
        .route("/api/v1/wildfire/score", post(wildfire_score_endpoint))
        .with_state(RiskRoutes { service, engine })
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

/// Browser access for the report frontend. No configured origins means any
/// origin may call the API.
pub(crate) fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn risk_report_endpoint(
    State(routes): State<RiskRoutes>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<HazardReport>, AppError> {
    let Json(request) = payload?;
    info!(address = %request.address, "risk report requested");
    let today = Local::now().date_naive();
    let report = routes.service.report(request, today).await?;
    Ok(Json(report))
}

pub(crate) async fn wildfire_score_endpoint(
    State(routes): State<RiskRoutes>,
    payload: Result<Json<IndicatorSet>, JsonRejection>,
) -> Result<Json<WildfireScoreResponse>, AppError> {
    let Json(indicators) = payload?;
    let assessment = routes.engine.aggregate(&indicators)?;
    let display_score = display_score(assessment.score);
    Ok(Json(WildfireScoreResponse {
        assessment,
        display_score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;
    use wildfire_risk::geocode::{GeocodeError, GeocodedLocation, Geocoder};
    use wildfire_risk::indicators::GeoPoint;
    use wildfire_risk::report::{ReportError, ReportGenerator};

    const MODEL_REPORT: &str = r#"{
      "location": {"address": "88 Ridge Way", "latitude": 37.77, "longitude": -122.42},
      "risk_scores": [
        {"risk_type": "Flood", "score": 4, "explanation": "Bay-adjacent lowlands."},
        {"risk_type": "Wildfire", "score": 7, "explanation": "Grassland interface."},
        {"risk_type": "Storm", "score": 2, "explanation": "Mild winters."},
        {"risk_type": "Drought", "score": 5, "explanation": "Periodic dry years."}
      ],
      "overall_summary": "Moderate exposure.",
      "automated_decision": "Approve"
    }"#;

    struct CannedGenerator;

    #[async_trait::async_trait]
    impl ReportGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ReportError> {
            Ok(MODEL_REPORT.to_string())
        }
    }

    struct DownGenerator;

    #[async_trait::async_trait]
    impl ReportGenerator for DownGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ReportError> {
            Err(ReportError::Status {
                status: 429,
                body: "quota exhausted".to_string(),
            })
        }
    }

    struct FixedGeocoder(Option<GeoPoint>);

    #[async_trait::async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
            Ok(self.0.map(|point| GeocodedLocation {
                point,
                display_name: None,
            }))
        }
    }

    fn router_with(generator: impl ReportGenerator + 'static, geocoder: FixedGeocoder) -> Router {
        let service = RiskReportService::new(None, Arc::new(generator), Arc::new(geocoder));
        with_risk_routes(Arc::new(service), RiskEngine::default())
    }

    fn router() -> Router {
        router_with(CannedGenerator, FixedGeocoder(None))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let app = router().layer(Extension(state.clone()));

        let response = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn risk_report_route_returns_display_scale_scores() {
        let response = router()
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "88 Ridge Way", "latitude": 37.77, "longitude": -122.42 }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let scores: Vec<f64> = payload["risk_scores"]
            .as_array()
            .expect("risk scores array")
            .iter()
            .map(|entry| entry["score"].as_f64().expect("numeric score"))
            .collect();
        assert_eq!(scores, vec![40.0, 70.0, 20.0, 50.0]);
        assert_eq!(payload["location"]["latitude"], 37.77);
    }

    #[tokio::test]
    async fn risk_report_route_maps_lookup_failures() {
        let response = router()
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "Atlantis" }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "Could not find location for that address.");

        let response = router()
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "" }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn risk_report_route_requires_an_address_and_answers_in_json() {
        let response = router()
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "latitude": 1.0, "longitude": 2.0 }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "No address provided.");
    }

    #[tokio::test]
    async fn risk_report_route_accepts_string_coordinates() {
        let response = router()
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "88 Ridge Way", "latitude": "37.77", "longitude": "-122.42" }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_bodies_are_json_bad_requests() {
        let response = router()
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "88 Ridge Way", "latitude": "north", "longitude": 2.0 }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "Invalid JSON in request body.");
        assert!(payload["details"].as_str().is_some());

        let response = router()
            .oneshot(
                Request::post("/api/v1/wildfire/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"fireCount\": "))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "Invalid JSON in request body.");
    }

    #[tokio::test]
    async fn schema_mismatch_from_model_is_labelled_as_such() {
        struct StringScoreGenerator;

        #[async_trait::async_trait]
        impl ReportGenerator for StringScoreGenerator {
            async fn generate(&self, _prompt: &str) -> Result<String, ReportError> {
                Ok(r#"{"risk_scores":[{"risk_type":"Wildfire","score":"7","explanation":"Dry."}]}"#
                    .to_string())
            }
        }

        let response = router_with(StringScoreGenerator, FixedGeocoder(None))
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "88 Ridge Way", "latitude": 37.77, "longitude": -122.42 }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = read_json_body(response).await;
        let details = payload["details"].as_str().unwrap_or_default();
        assert!(details.contains("does not match the report format"));
        assert!(!details.contains("non-JSON"));
        assert!(payload["raw_response"].as_str().is_some());
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default_and_restricts_when_configured() {
        let request = || {
            Request::get("/health")
                .header(header::ORIGIN, "https://frontend.example.com")
                .body(Body::empty())
                .expect("request builds")
        };

        let response = router()
            .layer(cors_layer(&[]))
            .oneshot(request())
            .await
            .expect("route executes");
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );

        let response = router()
            .layer(cors_layer(&["https://frontend.example.com".to_string()]))
            .oneshot(request())
            .await
            .expect("route executes");
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://frontend.example.com"))
        );

        let response = router()
            .layer(cors_layer(&["https://other.example.com".to_string()]))
            .oneshot(request())
            .await
            .expect("route executes");
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn risk_report_route_surfaces_model_failures() {
        let geocoded = GeoPoint::new(37.77, -122.42).expect("valid point");
        let response = router_with(DownGenerator, FixedGeocoder(Some(geocoded)))
            .oneshot(post_json(
                "/api/get-risk-report",
                json!({ "address": "88 Ridge Way" }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = read_json_body(response).await;
        assert!(payload["details"]
            .as_str()
            .unwrap_or_default()
            .contains("429"));
    }

    #[tokio::test]
    async fn wildfire_score_route_scores_partial_indicators() {
        let response = router()
            .oneshot(post_json(
                "/api/v1/wildfire/score",
                json!({ "fireCount": 3, "vegetationIndex": 0.45 }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        // fire 5.0, vegetation 5.0, the rest neutral
        assert_eq!(payload["score"], 5.0);
        assert_eq!(payload["display_score"], 50.0);
        assert!(payload["explanation"]
            .as_str()
            .unwrap_or_default()
            .starts_with("3 historical fires indicate moderate risk"));
        assert_eq!(payload["data_sources"]["fire"], true);
        assert_eq!(payload["data_sources"]["elevation"], false);
    }
}
