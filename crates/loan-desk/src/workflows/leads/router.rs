use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use super::domain::{LeadReceipt, LoanApplication};
use super::notifier::NotificationSender;
use super::service::LeadIntakeService;
use crate::error::AppError;

/// Router builder exposing the loan application intake endpoint.
pub fn lead_router<N>(service: Arc<LeadIntakeService<N>>) -> Router
where
    N: NotificationSender + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<N>))
        .with_state(service)
}

/// Status codes for rejected submissions come from `AppError`.
pub(crate) async fn submit_handler<N>(
    State(service): State<Arc<LeadIntakeService<N>>>,
    Json(application): Json<LoanApplication>,
) -> Result<(StatusCode, Json<LeadReceipt>), AppError>
where
    N: NotificationSender + 'static,
{
    let receipt = service.submit(application)?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
