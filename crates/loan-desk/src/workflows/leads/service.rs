use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{LeadReceipt, LeadReference, LoanApplication};
use super::notifier::{LeadNotification, NotificationError, NotificationSender};
use crate::workflows::quoting::{QuoteEngine, QuoteOutcome, SelectionBasis};

pub const QUOTED_TEMPLATE: &str = "loan_application_quoted";
pub const PERSONALIZED_TEMPLATE: &str = "personalized_quote_request";

/// Service composing the quote engine and the notification sender.
pub struct LeadIntakeService<N> {
    engine: Arc<QuoteEngine>,
    sender: Arc<N>,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reference() -> LeadReference {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadReference(format!("lead-{id:06}"))
}

impl<N> LeadIntakeService<N>
where
    N: NotificationSender + 'static,
{
    pub fn new(engine: Arc<QuoteEngine>, sender: Arc<N>) -> Self {
        Self { engine, sender }
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    /// Validate, quote, and notify. The receipt carries the same outcome the
    /// borrower saw on the form.
    pub fn submit(&self, application: LoanApplication) -> Result<LeadReceipt, LeadIntakeError> {
        validate(&application)?;

        let reference = next_reference();
        let outcome = self.engine.quote(&application.deal);
        let notification = build_notification(&reference, &application, &outcome);

        self.sender.send(notification)?;
        info!(
            reference = %reference.0,
            loan_type = %outcome.loan_type(),
            automated = outcome.terms().is_some(),
            "loan application received"
        );

        Ok(LeadReceipt {
            reference,
            received_at: Utc::now(),
            outcome,
        })
    }
}

fn validate(application: &LoanApplication) -> Result<(), LeadIntakeError> {
    let contact = &application.contact;
    if contact.name.trim().is_empty() {
        return Err(LeadIntakeError::Validation {
            field: "contact.name",
            reason: "name is required",
        });
    }

    let email = contact.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(LeadIntakeError::Validation {
            field: "contact.email",
            reason: "a valid email address is required",
        });
    }

    if application.deal.loan_type.trim().is_empty() {
        return Err(LeadIntakeError::Validation {
            field: "deal.loanType",
            reason: "loan type is required",
        });
    }

    Ok(())
}

fn build_notification(
    reference: &LeadReference,
    application: &LoanApplication,
    outcome: &QuoteOutcome,
) -> LeadNotification {
    let deal = &application.deal;
    let mut details = BTreeMap::new();
    details.insert("purchasePrice".to_string(), deal.purchase_price.to_string());
    details.insert("rehabBudget".to_string(), deal.rehab_budget.to_string());
    details.insert(
        "afterRepairValue".to_string(),
        deal.after_repair_value.to_string(),
    );
    details.insert(
        "requestedLoanAmount".to_string(),
        deal.requested_loan_amount.to_string(),
    );
    details.insert(
        "creditScoreBracket".to_string(),
        deal.credit_score_bracket.label(),
    );
    details.insert(
        "dealsIn24MonthsBracket".to_string(),
        deal.deals_in_24_months_bracket.label().to_string(),
    );
    details.insert(
        "citizenshipBracket".to_string(),
        deal.citizenship_bracket.label().to_string(),
    );
    if let Some(notes) = application.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        details.insert("notes".to_string(), notes.trim().to_string());
    }

    let template = match outcome {
        QuoteOutcome::Automated {
            program,
            selection,
            terms,
            ..
        } => {
            details.insert("programId".to_string(), program.id.clone());
            details.insert("interestRate".to_string(), terms.interest_rate.to_string());
            details.insert(
                "estimatedLoan".to_string(),
                terms.estimated_loan.to_string(),
            );
            details.insert(
                "monthlyInterest".to_string(),
                terms
                    .monthly_interest
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "\u{2014}".to_string()),
            );
            details.insert("capped".to_string(), terms.capped.to_string());
            details.insert(
                "fallbackTier".to_string(),
                (*selection == SelectionBasis::Fallback).to_string(),
            );
            QUOTED_TEMPLATE
        }
        QuoteOutcome::Personalized { .. } => PERSONALIZED_TEMPLATE,
    };

    LeadNotification {
        template: template.to_string(),
        reference: reference.clone(),
        contact: application.contact.clone(),
        loan_type: outcome.loan_type().to_string(),
        details,
    }
}

/// Error raised by the lead intake service.
#[derive(Debug, thiserror::Error)]
pub enum LeadIntakeError {
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
