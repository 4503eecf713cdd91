use serde::{Deserialize, Serialize};

use super::deal::DealInput;
use super::program::ProgramTier;

/// Concrete loan terms derived for one deal under one tier.
///
/// Currency amounts are whole units truncated toward zero, except the monthly
/// interest estimate which is rounded. `None` marks a figure that could not be
/// computed from the amounts provided and renders as a dash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub program_id: String,
    pub program_name: String,
    pub total_cost: u64,
    #[serde(rename = "maxByLTV")]
    pub max_by_ltv: Option<u64>,
    #[serde(rename = "maxByLTC")]
    pub max_by_ltc: Option<u64>,
    #[serde(rename = "maxByLTP")]
    pub max_by_ltp: Option<u64>,
    /// Binding constraint: the smallest of the applicable leverage limits.
    pub max_loan: Option<u64>,
    pub estimated_loan: u64,
    /// Requested amount exceeded `max_loan` and was reduced.
    pub capped: bool,
    pub interest_rate: f64,
    pub rate_type: String,
    pub origination_points: f64,
    pub min_origination_fee: u64,
    pub origination_fee: Option<u64>,
    /// Display hint: the minimum fee, not the points, set the fee.
    pub origination_fee_floored: bool,
    pub monthly_interest: Option<u64>,
    pub loan_term_months: u32,
    pub exit_points: f64,
    pub exit_fee: u64,
    pub legal_doc_fee: u64,
    pub bpo_appraisal_cost: u64,
    pub bpo_appraisal_note: Option<String>,
    #[serde(rename = "maxLTV")]
    pub max_ltv: f64,
    #[serde(rename = "maxLTC")]
    pub max_ltc: f64,
    #[serde(rename = "maxLTP")]
    pub max_ltp: f64,
    pub term_note: Option<String>,
}

/// Leverage limit for `basis` at `cap_percent`. A zero basis or zero cap is
/// not a binding constraint.
fn leverage_limit(basis: u64, cap_percent: f64) -> Option<u64> {
    if basis == 0 || cap_percent <= 0.0 {
        return None;
    }
    Some(percent_of(basis, cap_percent))
}

fn percent_of(amount: u64, percent: f64) -> u64 {
    let value = (amount as f64 * percent / 100.0).floor();
    if value <= 0.0 {
        0
    } else {
        value as u64
    }
}

pub fn derive_terms(deal: &DealInput, program: &ProgramTier) -> QuoteResult {
    let total_cost = deal.total_cost();

    let max_by_ltv = leverage_limit(deal.after_repair_value, program.max_ltv);
    let max_by_ltc = leverage_limit(total_cost, program.max_ltc);
    let max_by_ltp = leverage_limit(deal.purchase_price, program.max_ltp);
    let max_loan = [max_by_ltv, max_by_ltc, max_by_ltp]
        .into_iter()
        .flatten()
        .min();

    let requested = deal.requested_loan_amount;
    let estimated_loan = match max_loan {
        None => requested,
        Some(max) if requested > 0 => requested.min(max),
        Some(max) => max,
    };
    let capped = max_loan.is_some_and(|max| requested > max);

    let (origination_fee, origination_fee_floored) = if estimated_loan > 0 {
        let calculated = percent_of(estimated_loan, program.origination_points);
        let floored =
            program.min_origination_fee > 0 && calculated < program.min_origination_fee;
        (Some(calculated.max(program.min_origination_fee)), floored)
    } else {
        (None, false)
    };

    let monthly_interest = (estimated_loan > 0).then(|| {
        let interest = (estimated_loan as f64 * program.interest_rate / 100.0 / 12.0).round();
        if interest <= 0.0 {
            0
        } else {
            interest as u64
        }
    });

    let exit_fee = if estimated_loan > 0 && program.exit_points > 0.0 {
        percent_of(estimated_loan, program.exit_points)
    } else {
        0
    };

    QuoteResult {
        program_id: program.id.clone(),
        program_name: program.name.clone(),
        total_cost,
        max_by_ltv,
        max_by_ltc,
        max_by_ltp,
        max_loan,
        estimated_loan,
        capped,
        interest_rate: program.interest_rate,
        rate_type: program.rate_type.clone(),
        origination_points: program.origination_points,
        min_origination_fee: program.min_origination_fee,
        origination_fee,
        origination_fee_floored,
        monthly_interest,
        loan_term_months: program.term_months(),
        exit_points: program.exit_points,
        exit_fee,
        legal_doc_fee: program.legal_doc_fee,
        bpo_appraisal_cost: program.bpo_appraisal_cost,
        bpo_appraisal_note: program.bpo_appraisal_note.clone(),
        max_ltv: program.max_ltv,
        max_ltc: program.max_ltc,
        max_ltp: program.max_ltp,
        term_note: program.term_note.clone(),
    }
}
