use crate::workflows::quoting::brackets::{
    CitizenshipBracket, CreditScoreBracket, DealExperienceBracket,
};
use crate::workflows::quoting::program::{
    CitizenshipRequirement, LoanProgramCatalog, LoanProgramConfig, ProgramTier, TierRequirements,
};
use crate::workflows::quoting::DealInput;

pub(super) fn tier(id: &str) -> ProgramTier {
    ProgramTier {
        id: id.to_string(),
        name: id.to_string(),
        interest_rate: 11.0,
        rate_type: "Fixed".to_string(),
        origination_points: 2.0,
        min_origination_fee: 2_000,
        max_ltv: 70.0,
        max_ltc: 90.0,
        max_ltp: 0.0,
        max_term: 12,
        loan_term_months: 12,
        exit_points: 0.0,
        legal_doc_fee: 995,
        bpo_appraisal_cost: 450,
        bpo_appraisal_note: None,
        term_note: None,
        requirements: TierRequirements::default(),
    }
}

pub(super) fn gated_tier(
    id: &str,
    min_credit_score: u16,
    min_deals_24_months: u32,
    citizenship: CitizenshipRequirement,
) -> ProgramTier {
    let mut tier = tier(id);
    tier.requirements = TierRequirements {
        min_credit_score,
        min_deals_24_months,
        citizenship,
    };
    tier
}

pub(super) fn config(programs: Vec<ProgramTier>) -> LoanProgramConfig {
    LoanProgramConfig {
        programs,
        ..LoanProgramConfig::default()
    }
}

/// Three-tier fix and flip ladder: credit+experience gated, resident gated, open.
pub(super) fn fix_and_flip_config() -> LoanProgramConfig {
    config(vec![
        gated_tier("tier-1", 700, 2, CitizenshipRequirement::Any),
        gated_tier("tier-2", 0, 0, CitizenshipRequirement::UsResident),
        tier("tier-3"),
    ])
}

pub(super) fn cre_bridge_config() -> LoanProgramConfig {
    let programs = [(12, 0.0), (18, 1.0), (24, 2.0)]
        .into_iter()
        .map(|(months, exit_points)| {
            let mut tier = tier(&format!("cre-{months}"));
            tier.loan_term_months = months;
            tier.max_term = months;
            tier.exit_points = exit_points;
            tier
        })
        .collect();
    config(programs)
}

pub(super) fn catalog() -> LoanProgramCatalog {
    let mut catalog = LoanProgramCatalog::new();
    catalog.insert("Fix & Flip", fix_and_flip_config());
    catalog.insert("CRE Bridge", cre_bridge_config());
    catalog
}

pub(super) fn scenario_deal() -> DealInput {
    DealInput {
        loan_type: "Fix & Flip".to_string(),
        purchase_price: 200_000,
        rehab_budget: 50_000,
        after_repair_value: 320_000,
        requested_loan_amount: 200_000,
        credit_score_bracket: CreditScoreBracket::From760,
        deals_in_24_months_bracket: DealExperienceBracket::ThreeToFive,
        citizenship_bracket: CitizenshipBracket::UsCitizen,
        selected_term_months: None,
    }
}
