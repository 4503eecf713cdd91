//! Loan application intake: quote the deal, then hand the lead to the
//! notification sender so a loan officer can follow up.

pub mod domain;
pub mod notifier;
pub mod router;
pub mod service;

pub use domain::{ContactDetails, LeadReceipt, LeadReference, LoanApplication};
pub use notifier::{LeadNotification, NotificationError, NotificationSender};
pub use router::lead_router;
pub use service::{LeadIntakeError, LeadIntakeService};
