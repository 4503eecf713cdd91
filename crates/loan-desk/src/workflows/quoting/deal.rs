use serde::{Deserialize, Serialize};

use super::amounts::{deserialize_currency, deserialize_optional_months};
use super::brackets::{CitizenshipBracket, CreditScoreBracket, DealExperienceBracket};

/// Borrower and deal attributes captured by the application form for a
/// single quote request. Zero amounts mean "not provided".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealInput {
    pub loan_type: String,
    #[serde(default, deserialize_with = "deserialize_currency")]
    pub purchase_price: u64,
    #[serde(default, deserialize_with = "deserialize_currency")]
    pub rehab_budget: u64,
    #[serde(default, deserialize_with = "deserialize_currency")]
    pub after_repair_value: u64,
    #[serde(default, deserialize_with = "deserialize_currency")]
    pub requested_loan_amount: u64,
    #[serde(default)]
    pub credit_score_bracket: CreditScoreBracket,
    #[serde(default)]
    pub deals_in_24_months_bracket: DealExperienceBracket,
    #[serde(default)]
    pub citizenship_bracket: CitizenshipBracket,
    /// Only consulted for commercial term loan types.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_months",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_term_months: Option<u32>,
}

impl DealInput {
    pub fn new(loan_type: impl Into<String>) -> Self {
        Self {
            loan_type: loan_type.into(),
            ..Self::default()
        }
    }

    /// Purchase price plus rehab budget, the basis for loan-to-cost.
    pub fn total_cost(&self) -> u64 {
        self.purchase_price.saturating_add(self.rehab_budget)
    }
}
