use crate::cli::ServeArgs;
use crate::infra::{AppState, LoggingNotificationSender};
use crate::routes::with_loan_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_desk::config::AppConfig;
use loan_desk::error::AppError;
use loan_desk::telemetry;
use loan_desk::workflows::leads::LeadIntakeService;
use loan_desk::workflows::quoting::QuoteEngine;
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

    let catalog = config.pricing.load_catalog()?;
    info!(
        source = ?config.pricing.programs_path,
        loan_types = catalog.loan_types().count(),
        tiers = catalog.tier_count(),
        "loan program catalog loaded"
    );
    let engine = Arc::new(QuoteEngine::new(catalog));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: engine.clone(),
    };

    let sender = Arc::new(LoggingNotificationSender);
    let lead_service = Arc::new(LeadIntakeService::new(engine, sender));

    let app = with_loan_routes(lead_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
