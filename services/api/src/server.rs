use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDealRepository, InMemorySettingsStore};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use quickliqi::config::AppConfig;
use quickliqi::error::AppError;
use quickliqi::telemetry;
use quickliqi::workflows::candidates::MockMarketScanner;
use quickliqi::workflows::deals::DealPipelineService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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
        market_scan_enabled: config.market_scan.enabled(),
    };

    let deal_service = Arc::new(DealPipelineService::new(
        Arc::new(InMemoryDealRepository::default()),
        Arc::new(InMemorySettingsStore::default()),
    ));
    let scanner = Arc::new(MockMarketScanner::from_config(&config.market_scan));

    let app = with_pipeline_routes(deal_service, scanner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        market_scan = config.market_scan.enabled(),
        "deal pipeline service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
