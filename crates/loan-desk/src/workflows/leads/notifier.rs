use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ContactDetails, LeadReference};

/// Outbound hook for lead notifications (email relay, CRM webhook, ...).
pub trait NotificationSender: Send + Sync {
    fn send(&self, notification: LeadNotification) -> Result<(), NotificationError>;
}

/// Structured payload the sender turns into a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadNotification {
    pub template: String,
    pub reference: LeadReference,
    pub contact: ContactDetails,
    pub loan_type: String,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("notification rejected: {0}")]
    Rejected(String),
}
