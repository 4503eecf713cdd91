use super::normalizer::normalize_header;
use crate::workflows::quoting::amounts::{parse_count, parse_currency, parse_percent};
use crate::workflows::quoting::program::{
    CitizenshipRequirement, ProgramTier, TierRequirements, DEFAULT_RATE_TYPE, DEFAULT_TERM_MONTHS,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One data row of the pricing sheet, after header normalization.
#[derive(Debug)]
pub(crate) struct PricingRecord {
    pub(crate) loan_type: String,
    pub(crate) arv_label: Option<String>,
    pub(crate) tier: Option<ProgramTier>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<PricingRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    csv_reader.set_headers(headers);

    let mut records = Vec::new();
    for record in csv_reader.deserialize::<PricingRow>() {
        let row = record?;
        let Some(loan_type) = row.loan_type.clone() else {
            continue;
        };

        records.push(PricingRecord {
            loan_type,
            arv_label: row.arv_label.clone(),
            tier: row.into_tier(),
        });
    }

    Ok(records)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PricingRow {
    #[serde(deserialize_with = "empty_string_as_none")]
    loan_type: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    arv_label: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    program_id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    program_name: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    interest_rate: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    rate_type: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    origination_points: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    min_origination_fee: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    max_ltv: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    max_ltc: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    max_ltp: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    max_term: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    loan_term_months: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    exit_points: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    legal_doc_fee: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    bpo_appraisal_cost: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    bpo_appraisal_note: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    term_note: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    min_credit_score: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    min_deals_24_months: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    citizenship: Option<String>,
}

impl PricingRow {
    /// A row without a program id or interest rate only labels its loan type.
    fn into_tier(self) -> Option<ProgramTier> {
        let id = self.program_id?;
        let interest_rate = self.interest_rate.as_deref().map(parse_percent)?;

        let percent = |cell: &Option<String>| cell.as_deref().map(parse_percent).unwrap_or(0.0);
        let currency = |cell: &Option<String>| cell.as_deref().map(parse_currency).unwrap_or(0);
        let months = |cell: &Option<String>| {
            cell.as_deref()
                .and_then(parse_count)
                .filter(|months| *months > 0)
                .unwrap_or(DEFAULT_TERM_MONTHS)
        };

        let min_credit_score = self
            .min_credit_score
            .as_deref()
            .and_then(parse_count)
            .map(|score| score.min(u16::MAX as u32) as u16)
            .unwrap_or(0);
        let min_deals_24_months = self
            .min_deals_24_months
            .as_deref()
            .and_then(parse_count)
            .unwrap_or(0);
        let citizenship = self
            .citizenship
            .as_deref()
            .map(CitizenshipRequirement::parse)
            .unwrap_or_default();

        Some(ProgramTier {
            name: self.program_name.clone().unwrap_or_else(|| id.clone()),
            id,
            interest_rate,
            rate_type: self
                .rate_type
                .clone()
                .unwrap_or_else(|| DEFAULT_RATE_TYPE.to_string()),
            origination_points: percent(&self.origination_points),
            min_origination_fee: currency(&self.min_origination_fee),
            max_ltv: percent(&self.max_ltv),
            max_ltc: percent(&self.max_ltc),
            max_ltp: percent(&self.max_ltp),
            max_term: months(&self.max_term),
            loan_term_months: months(&self.loan_term_months),
            exit_points: percent(&self.exit_points),
            legal_doc_fee: currency(&self.legal_doc_fee),
            bpo_appraisal_cost: currency(&self.bpo_appraisal_cost),
            bpo_appraisal_note: self.bpo_appraisal_note,
            term_note: self.term_note,
            requirements: TierRequirements {
                min_credit_score,
                min_deals_24_months,
                citizenship,
            },
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
