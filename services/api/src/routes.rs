use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_desk::error::AppError;
use loan_desk::workflows::leads::{lead_router, LeadIntakeService, NotificationSender};
use loan_desk::workflows::pricing::{PricingSheetImporter, PricingSync};
use loan_desk::workflows::quoting::{DealInput, LoanProgramCatalog, QuoteOutcome};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

pub(crate) fn with_loan_routes<N>(leads: Arc<LeadIntakeService<N>>) -> axum::Router
where
    N: NotificationSender + 'static,
{
    lead_router(leads)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/loan-programs",
            axum::routing::get(loan_programs_endpoint),
        )
        .route("/api/v1/quotes", axum::routing::post(quote_endpoint))
        .route(
            "/api/v1/pricing/sync",
            axum::routing::post(pricing_sync_endpoint),
        )
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

pub(crate) async fn loan_programs_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<LoanProgramCatalog> {
    Json(state.engine.catalog().clone())
}

pub(crate) async fn quote_endpoint(
    Extension(state): Extension<AppState>,
    Json(deal): Json<DealInput>,
) -> Json<QuoteOutcome> {
    Json(state.engine.quote(&deal))
}

/// Preview only: the running catalog is left untouched.
pub(crate) async fn pricing_sync_endpoint(body: String) -> Result<Json<PricingSync>, AppError> {
    let sync = PricingSheetImporter::from_reader(Cursor::new(body.into_bytes()))?;
    Ok(Json(sync))
}
