use serde::{Deserialize, Serialize};
use tracing::debug;

use super::deal::DealInput;
use super::program::{CitizenshipRequirement, LoanProgramConfig, ProgramTier};

/// Commercial loan types where the borrower picks the term directly and tiers
/// encode term/exit-point combinations instead of credit qualification.
pub const TERM_SELECT_LOAN_TYPES: &[&str] = &["CRE Bridge", "RV Park", "Multifamily"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    TermSelect,
    Qualification,
}

impl SelectionMode {
    pub fn for_loan_type(loan_type: &str) -> Self {
        let loan_type = loan_type.trim();
        if TERM_SELECT_LOAN_TYPES
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(loan_type))
        {
            Self::TermSelect
        } else {
            Self::Qualification
        }
    }
}

/// How the tier was chosen, kept alongside the quote for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionBasis {
    /// First tier whose thresholds the applicant clears.
    Qualified,
    /// Nothing qualified; the last tier was granted anyway.
    Fallback,
    /// Tier term matched the requested term.
    TermMatch,
    /// No tier matched the requested term; the first tier was used.
    TermDefault,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramSelection<'a> {
    pub tier: &'a ProgramTier,
    pub basis: SelectionBasis,
}

/// Numeric view of the applicant's brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualificationSignals {
    pub credit_floor: u16,
    pub deal_count: u32,
    pub us_resident: bool,
}

impl QualificationSignals {
    pub fn from_deal(deal: &DealInput) -> Self {
        Self {
            credit_floor: deal.credit_score_bracket.floor(),
            deal_count: deal.deals_in_24_months_bracket.deal_count(),
            us_resident: deal.citizenship_bracket.is_us_resident(),
        }
    }
}

/// Per-threshold result for a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCheck {
    pub meets_credit: bool,
    pub meets_experience: bool,
    pub meets_citizenship: bool,
}

impl TierCheck {
    pub fn evaluate(tier: &ProgramTier, signals: &QualificationSignals) -> Self {
        let requirements = &tier.requirements;
        Self {
            meets_credit: requirements.min_credit_score == 0
                || signals.credit_floor >= requirements.min_credit_score,
            meets_experience: signals.deal_count >= requirements.min_deals_24_months,
            meets_citizenship: requirements.citizenship == CitizenshipRequirement::Any
                || signals.us_resident,
        }
    }

    pub fn passes(&self) -> bool {
        self.meets_credit && self.meets_experience && self.meets_citizenship
    }
}

/// Picks the tier for a deal. Returns `None` only when the program list is
/// empty; an applicant who clears no tier still receives the last one.
pub fn select_program<'a>(
    deal: &DealInput,
    config: &'a LoanProgramConfig,
) -> Option<ProgramSelection<'a>> {
    match SelectionMode::for_loan_type(&deal.loan_type) {
        SelectionMode::TermSelect => select_by_term(deal.selected_term_months, config),
        SelectionMode::Qualification => {
            select_by_qualification(&QualificationSignals::from_deal(deal), config)
        }
    }
}

fn select_by_term(
    selected_term_months: Option<u32>,
    config: &LoanProgramConfig,
) -> Option<ProgramSelection<'_>> {
    let matched = selected_term_months.and_then(|months| {
        config
            .programs
            .iter()
            .find(|tier| tier.loan_term_months == months)
    });

    match matched {
        Some(tier) => Some(ProgramSelection {
            tier,
            basis: SelectionBasis::TermMatch,
        }),
        None => config.programs.first().map(|tier| ProgramSelection {
            tier,
            basis: SelectionBasis::TermDefault,
        }),
    }
}

fn select_by_qualification<'a>(
    signals: &QualificationSignals,
    config: &'a LoanProgramConfig,
) -> Option<ProgramSelection<'a>> {
    for tier in &config.programs {
        let check = TierCheck::evaluate(tier, signals);
        if check.passes() {
            return Some(ProgramSelection {
                tier,
                basis: SelectionBasis::Qualified,
            });
        }
        debug!(tier = %tier.id, ?check, "tier thresholds not met");
    }

    config.programs.last().map(|tier| ProgramSelection {
        tier,
        basis: SelectionBasis::Fallback,
    })
}
