use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::leads::LeadIntakeError;
use crate::workflows::pricing::PricingSyncError;
use crate::workflows::quoting::CatalogLoadError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Catalog(CatalogLoadError),
    Pricing(PricingSyncError),
    Lead(LeadIntakeError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Catalog(err) => write!(f, "loan program catalog error: {}", err),
            AppError::Pricing(err) => write!(f, "pricing sync error: {}", err),
            AppError::Lead(err) => write!(f, "lead intake error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Pricing(err) => Some(err),
            AppError::Lead(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Pricing(PricingSyncError::Csv(_)) => StatusCode::BAD_REQUEST,
            AppError::Lead(LeadIntakeError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Lead(LeadIntakeError::Notification(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Catalog(_)
            | AppError::Pricing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Lead(LeadIntakeError::Validation { field, .. }) => {
                json!({ "error": self.to_string(), "field": field })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CatalogLoadError> for AppError {
    fn from(value: CatalogLoadError) -> Self {
        Self::Catalog(value)
    }
}

impl From<PricingSyncError> for AppError {
    fn from(value: PricingSyncError) -> Self {
        Self::Pricing(value)
    }
}

impl From<LeadIntakeError> for AppError {
    fn from(value: LeadIntakeError) -> Self {
        Self::Lead(value)
    }
}
