//! Loan quoting and qualification.
//!
//! Quoting is a pure computation over a deal and the program catalog: pick a
//! tier for the loan type, then derive leverage-constrained terms for it. Loan
//! types absent from the catalog are routed to a personalized quote instead.

pub mod amounts;
pub mod brackets;
pub mod deal;
pub mod program;
pub mod selection;
pub mod terms;

#[cfg(test)]
mod tests;

pub use brackets::{CitizenshipBracket, CreditScoreBracket, DealExperienceBracket};
pub use deal::DealInput;
pub use program::{
    CatalogLoadError, CitizenshipRequirement, LoanProgramCatalog, LoanProgramConfig, ProgramTier,
    TierRequirements,
};
pub use selection::{
    select_program, ProgramSelection, QualificationSignals, SelectionBasis, SelectionMode,
    TierCheck,
};
pub use terms::{derive_terms, QuoteResult};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of a quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Automated {
        #[serde(rename = "loanType")]
        loan_type: String,
        program: ProgramTier,
        selection: SelectionBasis,
        terms: QuoteResult,
    },
    /// No automated pricing exists for the loan type; a loan officer follows up.
    Personalized {
        #[serde(rename = "loanType")]
        loan_type: String,
    },
}

impl QuoteOutcome {
    pub fn loan_type(&self) -> &str {
        match self {
            QuoteOutcome::Automated { loan_type, .. } | QuoteOutcome::Personalized { loan_type } => {
                loan_type
            }
        }
    }

    pub fn terms(&self) -> Option<&QuoteResult> {
        match self {
            QuoteOutcome::Automated { terms, .. } => Some(terms),
            QuoteOutcome::Personalized { .. } => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            QuoteOutcome::Automated {
                program,
                selection,
                terms,
                ..
            } => {
                let mut summary = format!(
                    "{} at {:.2}% for ${}",
                    program.name, terms.interest_rate, terms.estimated_loan
                );
                if terms.capped {
                    summary.push_str(" (capped by leverage limits)");
                }
                if *selection == SelectionBasis::Fallback {
                    summary.push_str(" (fallback tier)");
                }
                summary
            }
            QuoteOutcome::Personalized { loan_type } => {
                format!("personalized quote required for {loan_type}")
            }
        }
    }
}

/// Stateless quoting facade over a program catalog.
#[derive(Debug, Clone, Default)]
pub struct QuoteEngine {
    catalog: LoanProgramCatalog,
}

impl QuoteEngine {
    pub fn new(catalog: LoanProgramCatalog) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(LoanProgramCatalog::standard())
    }

    pub fn catalog(&self) -> &LoanProgramCatalog {
        &self.catalog
    }

    pub fn quote(&self, deal: &DealInput) -> QuoteOutcome {
        let loan_type = deal.loan_type.trim().to_string();
        let selection = self
            .catalog
            .get(&loan_type)
            .and_then(|config| select_program(deal, config));

        let Some(ProgramSelection { tier, basis }) = selection else {
            debug!(%loan_type, "no automated pricing for loan type");
            return QuoteOutcome::Personalized { loan_type };
        };

        if basis == SelectionBasis::Fallback {
            warn!(
                %loan_type,
                tier = %tier.id,
                "applicant cleared no tier thresholds; granting fallback tier"
            );
        }

        let terms = derive_terms(deal, tier);
        debug!(
            %loan_type,
            tier = %tier.id,
            ?basis,
            estimated_loan = terms.estimated_loan,
            capped = terms.capped,
            "quote derived"
        );

        QuoteOutcome::Automated {
            loan_type,
            program: tier.clone(),
            selection: basis,
            terms,
        }
    }
}
