use loan_desk::workflows::pricing::PricingSheetImporter;
use loan_desk::workflows::quoting::{
    CitizenshipBracket, CreditScoreBracket, DealExperienceBracket, DealInput, QuoteEngine,
    QuoteOutcome, SelectionBasis,
};

fn fix_and_flip_deal() -> DealInput {
    DealInput {
        purchase_price: 300_000,
        rehab_budget: 60_000,
        after_repair_value: 480_000,
        credit_score_bracket: CreditScoreBracket::From680To719,
        deals_in_24_months_bracket: DealExperienceBracket::OneToTwo,
        citizenship_bracket: CitizenshipBracket::UsCitizen,
        ..DealInput::new("Fix & Flip")
    }
}

fn synced_engine() -> QuoteEngine {
    let data = include_bytes!("../pricing_sheet.csv");
    let sync = PricingSheetImporter::from_reader(&data[..]).expect("pricing sheet syncs");
    QuoteEngine::new(sync.catalog)
}

#[test]
fn standard_catalog_quotes_mid_tier_borrower() {
    let engine = QuoteEngine::standard();

    let outcome = engine.quote(&fix_and_flip_deal());

    let QuoteOutcome::Automated {
        program,
        selection,
        terms,
        ..
    } = outcome
    else {
        panic!("fix & flip is automated");
    };
    assert_eq!(program.id, "ff-standard");
    assert_eq!(selection, SelectionBasis::Qualified);
    assert_eq!(terms.total_cost, 360_000);
    assert_eq!(terms.max_by_ltv, Some(312_000));
    assert_eq!(terms.max_by_ltc, Some(306_000));
    assert_eq!(terms.max_by_ltp, Some(255_000));
    assert_eq!(terms.max_loan, Some(255_000));
    assert_eq!(terms.estimated_loan, 255_000);
    assert!(!terms.capped);
    assert_eq!(terms.origination_fee, Some(6_375));
    assert!(!terms.origination_fee_floored);
    assert_eq!(terms.monthly_interest, Some(2_550));
}

#[test]
fn synced_catalog_quotes_like_the_standard_sheet() {
    let synced = synced_engine().quote(&fix_and_flip_deal());
    let standard = QuoteEngine::standard().quote(&fix_and_flip_deal());

    assert_eq!(
        synced.terms().map(|terms| terms.estimated_loan),
        standard.terms().map(|terms| terms.estimated_loan)
    );
    assert_eq!(
        synced.terms().map(|terms| terms.program_id.as_str()),
        Some("ff-standard")
    );
}

#[test]
fn gated_single_tier_falls_back() {
    let engine = synced_engine();
    let deal = DealInput {
        purchase_price: 100_000,
        requested_loan_amount: 90_000,
        credit_score_bracket: CreditScoreBracket::Below620,
        deals_in_24_months_bracket: DealExperienceBracket::FirstDeal,
        ..DealInput::new("Hard Money")
    };

    let outcome = engine.quote(&deal);

    let QuoteOutcome::Automated {
        selection, terms, ..
    } = &outcome
    else {
        panic!("hard money is automated");
    };
    assert_eq!(*selection, SelectionBasis::Fallback);
    // Only loan-to-cost applies: 75% of $100,000.
    assert_eq!(terms.max_loan, Some(75_000));
    assert_eq!(terms.estimated_loan, 75_000);
    assert!(terms.capped);
    assert_eq!(terms.loan_term_months, 6);
    assert!(outcome.summary().contains("fallback tier"));
}

#[test]
fn label_only_loan_type_is_personalized() {
    let engine = synced_engine();

    let outcome = engine.quote(&DealInput::new("Land Loan"));

    assert_eq!(
        outcome,
        QuoteOutcome::Personalized {
            loan_type: "Land Loan".to_string()
        }
    );
}

#[test]
fn foreign_national_skips_resident_only_dscr_tier() {
    let deal = DealInput {
        purchase_price: 400_000,
        after_repair_value: 420_000,
        credit_score_bracket: CreditScoreBracket::From760,
        citizenship_bracket: CitizenshipBracket::ForeignNational,
        ..DealInput::new("DSCR Rental")
    };

    let outcome = QuoteEngine::standard().quote(&deal);

    let terms = outcome.terms().expect("dscr is automated");
    assert_eq!(terms.program_id, "dscr-core");
    assert_eq!(terms.max_by_ltc, None);
    // 75% of purchase price binds before 75% of appraised value.
    assert_eq!(terms.estimated_loan, 300_000);
    assert_eq!(terms.loan_term_months, 360);
}

#[test]
fn commercial_term_selection_ignores_borrower_profile() {
    let engine = synced_engine();
    let mut deal = DealInput {
        purchase_price: 2_000_000,
        after_repair_value: 2_600_000,
        credit_score_bracket: CreditScoreBracket::Below620,
        selected_term_months: Some(24),
        ..DealInput::new("CRE Bridge")
    };

    let matched = engine.quote(&deal);
    let terms = matched.terms().expect("cre bridge is automated");
    assert_eq!(terms.program_id, "cre-24m");
    assert_eq!(terms.exit_points, 1.0);
    // 75% LTC on $2.0M binds before 65% LTV on $2.6M.
    assert_eq!(terms.estimated_loan, 1_500_000);
    assert_eq!(terms.exit_fee, 15_000);

    deal.selected_term_months = Some(36);
    let defaulted = engine.quote(&deal);
    let QuoteOutcome::Automated { selection, terms, .. } = defaulted else {
        panic!("cre bridge is automated");
    };
    assert_eq!(selection, SelectionBasis::TermDefault);
    assert_eq!(terms.program_id, "cre-12m");
}
