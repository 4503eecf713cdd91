use crate::infra::load_catalog;
use clap::Args;
use loan_desk::error::AppError;
use loan_desk::workflows::pricing::{write_catalog, write_catalog_to_path, PricingSheetImporter};
use loan_desk::workflows::quoting::amounts::parse_currency;
use loan_desk::workflows::quoting::{
    CitizenshipBracket, CreditScoreBracket, DealExperienceBracket, DealInput, QuoteEngine,
    QuoteOutcome, QuoteResult,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Loan type as it appears in the catalog (e.g. "Fix & Flip")
    #[arg(long)]
    pub(crate) loan_type: String,
    /// Purchase price; "$" and "," are accepted
    #[arg(long)]
    pub(crate) purchase_price: Option<String>,
    /// Rehab or construction budget
    #[arg(long)]
    pub(crate) rehab_budget: Option<String>,
    /// After repair value (or the loan type's equivalent valuation)
    #[arg(long)]
    pub(crate) arv: Option<String>,
    /// Requested loan amount; omitted means "as much as allowed"
    #[arg(long)]
    pub(crate) requested: Option<String>,
    /// Credit score bracket label (e.g. "720-759")
    #[arg(long, default_value = "")]
    pub(crate) credit_score: String,
    /// Deals completed in the last 24 months (e.g. "3-5")
    #[arg(long, default_value = "")]
    pub(crate) deals: String,
    /// Citizenship bracket (e.g. "US Citizen")
    #[arg(long, default_value = "")]
    pub(crate) citizenship: String,
    /// Term in months for commercial term loan types
    #[arg(long)]
    pub(crate) term_months: Option<u32>,
    /// Catalog JSON to quote against (defaults to LOAN_PROGRAMS_PATH or the built-in sheet)
    #[arg(long)]
    pub(crate) programs: Option<PathBuf>,
    /// Print the quote outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PricingSyncArgs {
    /// Pricing sheet CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Where to write the catalog JSON (stdout when omitted)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

impl QuoteArgs {
    fn deal(&self) -> DealInput {
        let amount = |raw: &Option<String>| raw.as_deref().map(parse_currency).unwrap_or(0);
        DealInput {
            loan_type: self.loan_type.clone(),
            purchase_price: amount(&self.purchase_price),
            rehab_budget: amount(&self.rehab_budget),
            after_repair_value: amount(&self.arv),
            requested_loan_amount: amount(&self.requested),
            credit_score_bracket: CreditScoreBracket::parse(&self.credit_score),
            deals_in_24_months_bracket: DealExperienceBracket::parse(&self.deals),
            citizenship_bracket: CitizenshipBracket::parse(&self.citizenship),
            selected_term_months: self.term_months,
        }
    }
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.programs.clone())?;
    let engine = QuoteEngine::new(catalog);
    let deal = args.deal();
    let outcome = engine.quote(&deal);

    if args.json {
        let rendered = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    let arv_label = engine
        .catalog()
        .get(&deal.loan_type)
        .map(|config| config.arv_label.as_str())
        .unwrap_or("After Repair Value");
    render_quote(&deal, arv_label, &outcome);
    Ok(())
}

pub(crate) fn run_pricing_sync(args: PricingSyncArgs) -> Result<(), AppError> {
    let sync = PricingSheetImporter::from_path(&args.csv)?;

    for warning in &sync.warnings {
        eprintln!("warning: {}: {}", warning.loan_type, warning.message);
    }

    match args.out {
        Some(path) => {
            write_catalog_to_path(&sync.catalog, &path)?;
            println!(
                "Synced {} rows into {} loan types ({} tiers) -> {}",
                sync.rows_read,
                sync.catalog.loan_types().count(),
                sync.catalog.tier_count(),
                path.display()
            );
        }
        None => {
            write_catalog(&sync.catalog, std::io::stdout().lock())?;
            println!();
        }
    }

    Ok(())
}

fn render_quote(deal: &DealInput, arv_label: &str, outcome: &QuoteOutcome) {
    println!("Loan quote: {}", outcome.loan_type());
    println!("- Purchase price: {}", money(Some(deal.purchase_price)));
    println!("- Rehab budget: {}", money(Some(deal.rehab_budget)));
    println!("- {arv_label}: {}", money(Some(deal.after_repair_value)));
    println!(
        "- Borrower: credit {} | {} deals in 24 months | {}",
        deal.credit_score_bracket.label(),
        deal.deals_in_24_months_bracket.label(),
        deal.citizenship_bracket.label()
    );

    let Some(terms) = outcome.terms() else {
        println!("\nNo automated pricing for this loan type.");
        println!("A loan officer will follow up with a personalized quote.");
        return;
    };

    println!("\n{}", outcome.summary());
    render_terms(terms);
}

fn render_terms(terms: &QuoteResult) {
    println!("Program: {} ({})", terms.program_name, terms.program_id);
    println!(
        "- Rate: {:.2}% {} | {} months",
        terms.interest_rate, terms.rate_type, terms.loan_term_months
    );
    println!(
        "- Leverage: LTV {} | LTC {} | LTP {}",
        money(terms.max_by_ltv),
        money(terms.max_by_ltc),
        money(terms.max_by_ltp)
    );
    println!(
        "- Estimated loan: {}{}",
        money(Some(terms.estimated_loan)),
        if terms.capped { " (capped)" } else { "" }
    );
    println!(
        "- Origination: {} pts -> {}{}",
        terms.origination_points,
        money(terms.origination_fee),
        if terms.origination_fee_floored {
            " (minimum fee)"
        } else {
            ""
        }
    );
    println!("- Monthly interest: {}", money(terms.monthly_interest));
    if terms.exit_points > 0.0 {
        println!(
            "- Exit: {} pts -> {}",
            terms.exit_points,
            money(Some(terms.exit_fee))
        );
    }
    println!(
        "- Legal/doc fee: {} | BPO/appraisal: {}",
        money(Some(terms.legal_doc_fee)),
        money(Some(terms.bpo_appraisal_cost))
    );
    if let Some(note) = &terms.bpo_appraisal_note {
        println!("  {note}");
    }
    if let Some(note) = &terms.term_note {
        println!("  {note}");
    }
}

/// `$1,234,567` style rendering; missing figures print as a dash.
pub(crate) fn money(value: Option<u64>) -> String {
    let Some(value) = value else {
        return "\u{2014}".to_string();
    };
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(Some(0)), "$0");
        assert_eq!(money(Some(950)), "$950");
        assert_eq!(money(Some(1_000)), "$1,000");
        assert_eq!(money(Some(1_234_567)), "$1,234,567");
        assert_eq!(money(None), "\u{2014}");
    }

    #[test]
    fn quote_args_build_deal_input() {
        let args = QuoteArgs {
            loan_type: "Fix & Flip".to_string(),
            purchase_price: Some("$200,000".to_string()),
            rehab_budget: Some("50000".to_string()),
            arv: None,
            requested: None,
            credit_score: "720-759".to_string(),
            deals: "3-5".to_string(),
            citizenship: "US Citizen".to_string(),
            term_months: None,
            programs: None,
            json: false,
        };

        let deal = args.deal();

        assert_eq!(deal.purchase_price, 200_000);
        assert_eq!(deal.total_cost(), 250_000);
        assert_eq!(deal.after_repair_value, 0);
        assert_eq!(deal.credit_score_bracket, CreditScoreBracket::From720To759);
        assert_eq!(deal.deals_in_24_months_bracket.deal_count(), 3);
        assert!(deal.citizenship_bracket.is_us_resident());
    }
}
