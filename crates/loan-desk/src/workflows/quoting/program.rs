use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ARV_LABEL: &str = "After Repair Value (ARV)";
pub const DEFAULT_RATE_TYPE: &str = "Fixed";
pub const DEFAULT_TERM_MONTHS: u32 = 12;

/// Residency restriction attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CitizenshipRequirement {
    #[default]
    Any,
    UsResident,
}

impl CitizenshipRequirement {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            Self::Any
        } else {
            Self::UsResident
        }
    }
}

impl From<String> for CitizenshipRequirement {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CitizenshipRequirement> for String {
    fn from(value: CitizenshipRequirement) -> Self {
        match value {
            CitizenshipRequirement::Any => "any".to_string(),
            CitizenshipRequirement::UsResident => "us_resident".to_string(),
        }
    }
}

/// Minimum qualification thresholds for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TierRequirements {
    /// 0 means no minimum.
    pub min_credit_score: u16,
    pub min_deals_24_months: u32,
    pub citizenship: CitizenshipRequirement,
}

impl TierRequirements {
    /// True when every applicant clears the thresholds, which is what the last
    /// tier of a qualification-select list is expected to look like.
    pub fn is_universal(&self) -> bool {
        self.min_credit_score == 0
            && self.min_deals_24_months == 0
            && self.citizenship == CitizenshipRequirement::Any
    }
}

/// One pricing tier within a loan type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramTier {
    pub id: String,
    pub name: String,
    pub interest_rate: f64,
    #[serde(default = "default_rate_type")]
    pub rate_type: String,
    #[serde(default)]
    pub origination_points: f64,
    #[serde(default)]
    pub min_origination_fee: u64,
    #[serde(default, rename = "maxLTV")]
    pub max_ltv: f64,
    #[serde(default, rename = "maxLTC")]
    pub max_ltc: f64,
    #[serde(default, rename = "maxLTP")]
    pub max_ltp: f64,
    /// Advisory label only; `loan_term_months` is authoritative.
    #[serde(default)]
    pub max_term: u32,
    #[serde(default)]
    pub loan_term_months: u32,
    #[serde(default)]
    pub exit_points: f64,
    #[serde(default)]
    pub legal_doc_fee: u64,
    #[serde(default)]
    pub bpo_appraisal_cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpo_appraisal_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_note: Option<String>,
    #[serde(default)]
    pub requirements: TierRequirements,
}

fn default_rate_type() -> String {
    DEFAULT_RATE_TYPE.to_string()
}

impl ProgramTier {
    pub fn term_months(&self) -> u32 {
        if self.loan_term_months > 0 {
            self.loan_term_months
        } else if self.max_term > 0 {
            self.max_term
        } else {
            DEFAULT_TERM_MONTHS
        }
    }
}

/// Tiers offered for one loan type, ordered best pricing first. The last tier
/// is the fallback for applicants who clear nothing above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProgramConfig {
    #[serde(default = "default_arv_label")]
    pub arv_label: String,
    #[serde(default)]
    pub programs: Vec<ProgramTier>,
}

fn default_arv_label() -> String {
    DEFAULT_ARV_LABEL.to_string()
}

impl Default for LoanProgramConfig {
    fn default() -> Self {
        Self {
            arv_label: default_arv_label(),
            programs: Vec::new(),
        }
    }
}

/// The `loanPrograms` table keyed by loan type. Loan types missing from the
/// catalog are quoted manually.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoanProgramCatalog {
    #[serde(rename = "loanPrograms", default)]
    loan_programs: BTreeMap<String, LoanProgramConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read loan program catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid loan program catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanProgramCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn get(&self, loan_type: &str) -> Option<&LoanProgramConfig> {
        self.loan_programs.get(loan_type.trim())
    }

    pub fn entry(&mut self, loan_type: &str) -> &mut LoanProgramConfig {
        self.loan_programs
            .entry(loan_type.trim().to_string())
            .or_default()
    }

    pub fn insert(&mut self, loan_type: impl Into<String>, config: LoanProgramConfig) {
        self.loan_programs.insert(loan_type.into(), config);
    }

    pub fn loan_types(&self) -> impl Iterator<Item = &str> {
        self.loan_programs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoanProgramConfig)> {
        self.loan_programs
            .iter()
            .map(|(loan_type, config)| (loan_type.as_str(), config))
    }

    pub fn tier_count(&self) -> usize {
        self.loan_programs
            .values()
            .map(|config| config.programs.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.loan_programs.is_empty()
    }

    /// Built-in rate sheet used when no synced catalog is configured.
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        catalog.insert(
            "Fix & Flip",
            LoanProgramConfig {
                arv_label: DEFAULT_ARV_LABEL.to_string(),
                programs: vec![
                    TierSpec::new("ff-preferred", "Preferred", 11.0, 2.0, 2_000)
                        .leverage(70.0, 90.0, 90.0)
                        .term(12)
                        .requires(700, 2, CitizenshipRequirement::Any)
                        .build(),
                    TierSpec::new("ff-standard", "Standard", 12.0, 2.5, 2_500)
                        .leverage(65.0, 85.0, 85.0)
                        .term(12)
                        .requires(660, 1, CitizenshipRequirement::Any)
                        .build(),
                    TierSpec::new("ff-starter", "Starter", 13.0, 3.0, 3_000)
                        .leverage(60.0, 80.0, 80.0)
                        .term(12)
                        .build(),
                ],
            },
        );

        catalog.insert(
            "DSCR Rental",
            LoanProgramConfig {
                arv_label: "Appraised Value".to_string(),
                programs: vec![
                    TierSpec::new("dscr-prime", "DSCR Prime", 7.25, 1.5, 3_000)
                        .leverage(80.0, 0.0, 80.0)
                        .term(360)
                        .requires(720, 0, CitizenshipRequirement::UsResident)
                        .build(),
                    TierSpec::new("dscr-core", "DSCR Core", 8.25, 2.0, 3_500)
                        .leverage(75.0, 0.0, 75.0)
                        .term(360)
                        .build(),
                ],
            },
        );

        catalog.insert(
            "Ground-Up Construction",
            LoanProgramConfig {
                arv_label: "Completed Value".to_string(),
                programs: vec![
                    TierSpec::new("guc-experienced", "Experienced Builder", 11.5, 2.0, 3_000)
                        .leverage(70.0, 85.0, 0.0)
                        .term(18)
                        .requires(680, 3, CitizenshipRequirement::Any)
                        .build(),
                    TierSpec::new("guc-standard", "Standard Builder", 12.5, 3.0, 3_500)
                        .leverage(65.0, 80.0, 0.0)
                        .term(18)
                        .build(),
                ],
            },
        );

        catalog.insert(
            "CRE Bridge",
            LoanProgramConfig {
                arv_label: "As-Stabilized Value".to_string(),
                programs: commercial_term_ladder("cre", 10.5, 65.0, 75.0, &[12, 18, 24]),
            },
        );

        catalog.insert(
            "RV Park",
            LoanProgramConfig {
                arv_label: "As-Stabilized Value".to_string(),
                programs: commercial_term_ladder("rv", 11.0, 60.0, 70.0, &[12, 24]),
            },
        );

        catalog.insert(
            "Multifamily",
            LoanProgramConfig {
                arv_label: "As-Stabilized Value".to_string(),
                programs: commercial_term_ladder("mf", 9.75, 70.0, 80.0, &[12, 24, 36]),
            },
        );

        catalog
    }
}

/// Term ladder where each step up in term adds one exit point.
fn commercial_term_ladder(
    prefix: &str,
    rate: f64,
    max_ltv: f64,
    max_ltc: f64,
    terms: &[u32],
) -> Vec<ProgramTier> {
    terms
        .iter()
        .enumerate()
        .map(|(step, months)| {
            let mut tier = TierSpec::new(
                &format!("{prefix}-{months}m"),
                &format!("{months}-Month Bridge"),
                rate,
                2.0,
                5_000,
            )
            .leverage(max_ltv, max_ltc, 0.0)
            .term(*months)
            .build();
            tier.exit_points = step as f64;
            tier.legal_doc_fee = 1_500;
            tier.term_note = Some("Interest-only, extension options available".to_string());
            tier
        })
        .collect()
}

struct TierSpec {
    tier: ProgramTier,
}

impl TierSpec {
    fn new(id: &str, name: &str, rate: f64, points: f64, min_fee: u64) -> Self {
        Self {
            tier: ProgramTier {
                id: id.to_string(),
                name: name.to_string(),
                interest_rate: rate,
                rate_type: DEFAULT_RATE_TYPE.to_string(),
                origination_points: points,
                min_origination_fee: min_fee,
                max_ltv: 0.0,
                max_ltc: 0.0,
                max_ltp: 0.0,
                max_term: DEFAULT_TERM_MONTHS,
                loan_term_months: DEFAULT_TERM_MONTHS,
                exit_points: 0.0,
                legal_doc_fee: 995,
                bpo_appraisal_cost: 450,
                bpo_appraisal_note: Some("Ordered after term sheet acceptance".to_string()),
                term_note: None,
                requirements: TierRequirements::default(),
            },
        }
    }

    fn leverage(mut self, max_ltv: f64, max_ltc: f64, max_ltp: f64) -> Self {
        self.tier.max_ltv = max_ltv;
        self.tier.max_ltc = max_ltc;
        self.tier.max_ltp = max_ltp;
        self
    }

    fn term(mut self, months: u32) -> Self {
        self.tier.max_term = months;
        self.tier.loan_term_months = months;
        self
    }

    fn requires(
        mut self,
        min_credit_score: u16,
        min_deals_24_months: u32,
        citizenship: CitizenshipRequirement,
    ) -> Self {
        self.tier.requirements = TierRequirements {
            min_credit_score,
            min_deals_24_months,
            citizenship,
        };
        self
    }

    fn build(self) -> ProgramTier {
        self.tier
    }
}
