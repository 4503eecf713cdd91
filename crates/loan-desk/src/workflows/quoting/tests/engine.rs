use super::common::*;
use crate::workflows::quoting::brackets::CreditScoreBracket;
use crate::workflows::quoting::program::LoanProgramConfig;
use crate::workflows::quoting::{DealInput, QuoteEngine, QuoteOutcome, SelectionBasis};

#[test]
fn engine_quotes_known_loan_types() {
    let engine = QuoteEngine::new(catalog());

    let outcome = engine.quote(&scenario_deal());

    match outcome {
        QuoteOutcome::Automated {
            loan_type,
            program,
            selection,
            terms,
        } => {
            assert_eq!(loan_type, "Fix & Flip");
            assert_eq!(program.id, "tier-1");
            assert_eq!(selection, SelectionBasis::Qualified);
            assert_eq!(terms.estimated_loan, 200_000);
        }
        other => panic!("expected automated quote, got {other:?}"),
    }
}

#[test]
fn unknown_loan_type_routes_to_personalized_quote() {
    let engine = QuoteEngine::new(catalog());
    let deal = DealInput::new("Land Loan");

    let outcome = engine.quote(&deal);

    assert_eq!(
        outcome,
        QuoteOutcome::Personalized {
            loan_type: "Land Loan".to_string()
        }
    );
    assert!(outcome.terms().is_none());
    assert!(outcome.summary().contains("personalized"));
}

#[test]
fn empty_program_list_routes_to_personalized_quote() {
    let mut catalog = catalog();
    catalog.insert("Fix & Flip", LoanProgramConfig::default());
    let engine = QuoteEngine::new(catalog);

    let outcome = engine.quote(&scenario_deal());

    assert!(matches!(outcome, QuoteOutcome::Personalized { .. }));
}

#[test]
fn fallback_selection_is_reported() {
    let mut catalog = catalog();
    catalog.insert(
        "Fix & Flip",
        config(vec![gated_tier(
            "gated",
            700,
            0,
            crate::workflows::quoting::CitizenshipRequirement::Any,
        )]),
    );
    let engine = QuoteEngine::new(catalog);
    let mut deal = scenario_deal();
    deal.credit_score_bracket = CreditScoreBracket::Below620;

    let outcome = engine.quote(&deal);

    match &outcome {
        QuoteOutcome::Automated { selection, .. } => {
            assert_eq!(*selection, SelectionBasis::Fallback)
        }
        other => panic!("expected automated quote, got {other:?}"),
    }
    assert!(outcome.summary().contains("fallback"));
}

#[test]
fn cre_bridge_quote_uses_selected_term() {
    let engine = QuoteEngine::new(catalog());
    let deal = DealInput {
        loan_type: "CRE Bridge".to_string(),
        purchase_price: 1_000_000,
        after_repair_value: 1_400_000,
        selected_term_months: Some(18),
        ..DealInput::default()
    };

    let outcome = engine.quote(&deal);
    let terms = outcome.terms().expect("automated terms");

    assert_eq!(terms.program_id, "cre-18");
    // min(1.4m * 70%, 1.0m * 90%) = 900,000
    assert_eq!(terms.estimated_loan, 900_000);
    assert_eq!(terms.exit_fee, 9_000);
}

#[test]
fn outcome_serializes_with_kind_tag() {
    let engine = QuoteEngine::new(catalog());

    let automated = serde_json::to_value(engine.quote(&scenario_deal())).expect("serialize");
    assert_eq!(automated["kind"], "automated");
    assert_eq!(automated["loanType"], "Fix & Flip");
    assert_eq!(automated["selection"], "qualified");
    assert_eq!(automated["terms"]["maxByLTV"], 224_000);
    assert_eq!(automated["terms"]["monthlyInterest"], 1_833);

    let personalized =
        serde_json::to_value(engine.quote(&DealInput::new("Land Loan"))).expect("serialize");
    assert_eq!(personalized["kind"], "personalized");
}

#[test]
fn standard_engine_quotes_every_catalog_loan_type() {
    let engine = QuoteEngine::standard();
    let loan_types: Vec<String> = engine.catalog().loan_types().map(str::to_string).collect();
    assert!(!loan_types.is_empty());

    for loan_type in loan_types {
        let deal = DealInput {
            loan_type: loan_type.clone(),
            purchase_price: 400_000,
            rehab_budget: 40_000,
            after_repair_value: 520_000,
            ..DealInput::default()
        };
        let outcome = engine.quote(&deal);
        let terms = outcome.terms().expect("automated quote");
        assert!(terms.estimated_loan > 0, "{loan_type} produced no loan");
    }
}
