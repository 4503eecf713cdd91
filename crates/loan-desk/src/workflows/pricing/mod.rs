//! Pricing sheet sync: turns the spreadsheet export maintained by the capital
//! markets team into the `loanPrograms` catalog consumed by the quoting engine.

mod normalizer;
mod parser;

use crate::workflows::quoting::program::LoanProgramCatalog;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub enum PricingSyncError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for PricingSyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingSyncError::Io(err) => write!(f, "failed to read pricing sheet: {}", err),
            PricingSyncError::Csv(err) => write!(f, "invalid pricing sheet CSV: {}", err),
            PricingSyncError::Json(err) => {
                write!(f, "could not write loan program catalog: {}", err)
            }
        }
    }
}

impl std::error::Error for PricingSyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PricingSyncError::Io(err) => Some(err),
            PricingSyncError::Csv(err) => Some(err),
            PricingSyncError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PricingSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PricingSyncError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for PricingSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Advisory finding about the synced table. Never blocks the sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingWarning {
    pub loan_type: String,
    pub message: String,
}

/// Catalog produced by a sync plus what was seen along the way.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSync {
    #[serde(flatten)]
    pub catalog: LoanProgramCatalog,
    pub rows_read: usize,
    pub warnings: Vec<PricingWarning>,
}

pub struct PricingSheetImporter;

impl PricingSheetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PricingSync, PricingSyncError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PricingSync, PricingSyncError> {
        let mut catalog = LoanProgramCatalog::new();
        let records = parser::parse_records(reader)?;
        let rows_read = records.len();

        for record in records {
            let config = catalog.entry(&record.loan_type);
            if let Some(label) = record.arv_label {
                config.arv_label = label;
            }
            if let Some(tier) = record.tier {
                config.programs.push(tier);
            }
        }

        let warnings = fallback_warnings(&catalog);
        for warning in &warnings {
            warn!(loan_type = %warning.loan_type, "{}", warning.message);
        }
        info!(
            rows_read,
            loan_types = catalog.loan_types().count(),
            tiers = catalog.tier_count(),
            "pricing sheet synced"
        );

        Ok(PricingSync {
            catalog,
            rows_read,
            warnings,
        })
    }
}

/// Serializes a catalog in the `{"loanPrograms": {...}}` shape the service loads.
pub fn write_catalog<W: Write>(
    catalog: &LoanProgramCatalog,
    writer: W,
) -> Result<(), PricingSyncError> {
    serde_json::to_writer_pretty(writer, catalog)?;
    Ok(())
}

pub fn write_catalog_to_path<P: AsRef<Path>>(
    catalog: &LoanProgramCatalog,
    path: P,
) -> Result<(), PricingSyncError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_catalog(catalog, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Qualification-select lists hand their last tier to anyone who clears
/// nothing above it, so a gated last tier is almost always a data-entry slip.
fn fallback_warnings(catalog: &LoanProgramCatalog) -> Vec<PricingWarning> {
    use crate::workflows::quoting::SelectionMode;

    let mut warnings = Vec::new();
    for (loan_type, config) in catalog.iter() {
        if SelectionMode::for_loan_type(loan_type) == SelectionMode::TermSelect {
            continue;
        }
        match config.programs.last() {
            None => warnings.push(PricingWarning {
                loan_type: loan_type.to_string(),
                message: "no program tiers; loan type will be quoted manually".to_string(),
            }),
            Some(last) if !last.requirements.is_universal() => warnings.push(PricingWarning {
                loan_type: loan_type.to_string(),
                message: format!(
                    "fallback tier '{}' has qualification thresholds; unqualified applicants will still receive it",
                    last.id
                ),
            }),
            Some(_) => {}
        }
    }
    warnings
}
