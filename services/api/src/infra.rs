use loan_desk::config::AppConfig;
use loan_desk::error::AppError;
use loan_desk::workflows::leads::{LeadNotification, NotificationError, NotificationSender};
use loan_desk::workflows::quoting::{LoanProgramCatalog, QuoteEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<QuoteEngine>,
}

/// Writes each lead notification to the log for the loan officers' log
/// shipper. Nothing is retained in process.
#[derive(Default, Clone, Copy)]
pub(crate) struct LoggingNotificationSender;

impl NotificationSender for LoggingNotificationSender {
    fn send(&self, notification: LeadNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            reference = %notification.reference.0,
            loan_type = %notification.loan_type,
            email = %notification.contact.email,
            details = ?notification.details,
            "lead notification sent"
        );
        Ok(())
    }
}

/// An explicit path wins over `LOAN_PROGRAMS_PATH`; with neither, the
/// built-in sheet is used.
pub(crate) fn load_catalog(path: Option<PathBuf>) -> Result<LoanProgramCatalog, AppError> {
    let catalog = match path {
        Some(path) => LoanProgramCatalog::from_path(path)?,
        None => AppConfig::load()?.pricing.load_catalog()?,
    };
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_desk::workflows::leads::{ContactDetails, LeadReference};
    use std::collections::BTreeMap;

    #[test]
    fn logging_sender_accepts_notifications() {
        let notification = LeadNotification {
            template: "personalized_quote_request".to_string(),
            reference: LeadReference("lead-000042".to_string()),
            contact: ContactDetails {
                name: "Jordan Reyes".to_string(),
                email: "jordan@example.com".to_string(),
                phone: None,
                company: None,
            },
            loan_type: "Land Loan".to_string(),
            details: BTreeMap::new(),
        };

        assert!(LoggingNotificationSender.send(notification).is_ok());
    }
}
