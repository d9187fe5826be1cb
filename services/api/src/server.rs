use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCatalogRepository, InMemoryHistoryRepository};
use crate::routes::with_diagnosis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use maturity_diagnostic::config::AppConfig;
use maturity_diagnostic::error::AppError;
use maturity_diagnostic::telemetry;
use maturity_diagnostic::workflows::diagnosis::DiagnosisService;
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
    };

    let catalog = Arc::new(InMemoryCatalogRepository::default());
    let history = Arc::new(InMemoryHistoryRepository::default());
    let diagnosis_service = DiagnosisService::new(catalog, history)
        .with_new_scope_weights(config.scoring.new_scope_weights.clone());
    if diagnosis_service.seed_standard_catalog()? {
        info!("seeded the standard assessment scope");
    }

    let app = with_diagnosis_routes(Arc::new(diagnosis_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "maturity diagnostic service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
