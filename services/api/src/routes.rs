use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use quickliqi::workflows::candidates::{candidate_router, MarketScanner};
use quickliqi::workflows::deals::{
    deal_router, DealPipelineService, DealRepository, SettingsStore,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_pipeline_routes<R, S, M>(
    service: Arc<DealPipelineService<R, S>>,
    scanner: Arc<M>,
) -> axum::Router
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
    M: MarketScanner + 'static,
{
    deal_router(service)
        .merge(candidate_router(scanner))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/health", axum::routing::get(service_health_endpoint))
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

/// Dashboard-facing health summary.
pub(crate) async fn service_health_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "serpapi_enabled": state.market_scan_enabled,
        "database": "in-memory",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryDealRepository, InMemorySettingsStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use quickliqi::workflows::candidates::MockMarketScanner;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn test_app(ready: bool, scan_enabled: bool) -> axum::Router {
        let service = Arc::new(DealPipelineService::new(
            Arc::new(InMemoryDealRepository::default()),
            Arc::new(InMemorySettingsStore::default()),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            market_scan_enabled: scan_enabled,
        };
        with_pipeline_routes(service, Arc::new(MockMarketScanner::new(scan_enabled)))
            .layer(Extension(state))
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn service_health_reports_scan_availability() {
        let (status, body) = get_json(test_app(true, false), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["serpapi_enabled"], false);
        assert_eq!(body["database"], "in-memory");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn readiness_waits_for_listener() {
        let (status, body) = get_json(test_app(false, false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");
    }

    #[tokio::test]
    async fn deal_and_candidate_routes_are_mounted() {
        let (status, body) = get_json(test_app(true, true), "/api/settings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["min_coc_pct"], 12.0);

        let (status, deals) = get_json(test_app(true, true), "/api/deals").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deals, Value::Array(Vec::new()));
    }
}
