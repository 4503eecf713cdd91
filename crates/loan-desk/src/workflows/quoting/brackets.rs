//! Intake-form brackets and the numeric thresholds they stand for.
//!
//! The application form submits human-readable labels ("720–759", "3–5 deals").
//! Each bracket is an enum with an explicit label table so that qualification
//! compares numbers, not strings. Labels outside the table degrade to the most
//! conservative value instead of failing.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['\u{2013}', '\u{2014}'], "-");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Other(IgnoredAny),
}

/// Reads a form label. Nulls, numbers and other non-string values yield
/// `None` so the caller falls back to its most conservative bracket.
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawLabel::deserialize(deserializer)? {
        RawLabel::Text(label) => Some(label),
        RawLabel::Other(_) => None,
    })
}

fn lookup<T: Copy>(table: &[(&str, T)], label: &str) -> Option<T> {
    let normalized = normalize_label(label);
    table
        .iter()
        .find(|(candidate, _)| normalize_label(candidate) == normalized)
        .map(|(_, value)| *value)
}

/// Self-reported credit score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum CreditScoreBracket {
    From760,
    From720To759,
    From680To719,
    From640To679,
    From620To639,
    Below620,
    #[default]
    NotSure,
    /// Label missing from the form table; keeps the score it started with.
    Unlisted(u16),
}

const CREDIT_SCORE_LABELS: &[(&str, CreditScoreBracket)] = &[
    ("760 or higher", CreditScoreBracket::From760),
    ("720\u{2013}759", CreditScoreBracket::From720To759),
    ("680\u{2013}719", CreditScoreBracket::From680To719),
    ("640\u{2013}679", CreditScoreBracket::From640To679),
    ("620\u{2013}639", CreditScoreBracket::From620To639),
    ("Below 620", CreditScoreBracket::Below620),
    ("Not sure", CreditScoreBracket::NotSure),
];

impl CreditScoreBracket {
    pub fn parse(label: &str) -> Self {
        if let Some(bracket) = lookup(CREDIT_SCORE_LABELS, label) {
            return bracket;
        }

        let digits: String = label
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        match digits.parse::<u16>() {
            Ok(score) => Self::Unlisted(score),
            Err(_) => Self::NotSure,
        }
    }

    /// Lowest score the bracket guarantees. Brackets without a numeric floor
    /// only clear tiers that have no credit minimum.
    pub fn floor(self) -> u16 {
        match self {
            Self::From760 => 760,
            Self::From720To759 => 720,
            Self::From680To719 => 680,
            Self::From640To679 => 640,
            Self::From620To639 => 620,
            Self::Below620 | Self::NotSure => 0,
            Self::Unlisted(score) => score,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Unlisted(score) => score.to_string(),
            known => CREDIT_SCORE_LABELS
                .iter()
                .find(|(_, bracket)| *bracket == known)
                .map(|(label, _)| (*label).to_string())
                .unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for CreditScoreBracket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient_label(deserializer)?
            .map(|label| Self::parse(&label))
            .unwrap_or_default())
    }
}

impl From<String> for CreditScoreBracket {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CreditScoreBracket> for String {
    fn from(value: CreditScoreBracket) -> Self {
        value.label()
    }
}

/// Number of deals the borrower closed in the last 24 months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum DealExperienceBracket {
    FirstDeal,
    OneToTwo,
    ThreeToFive,
    SixToNine,
    TenPlus,
    #[default]
    Unrecognized,
}

const DEAL_EXPERIENCE_LABELS: &[(&str, DealExperienceBracket)] = &[
    ("0 \u{2014} First deal", DealExperienceBracket::FirstDeal),
    ("1\u{2013}2 deals", DealExperienceBracket::OneToTwo),
    ("3\u{2013}5 deals", DealExperienceBracket::ThreeToFive),
    ("6\u{2013}9 deals", DealExperienceBracket::SixToNine),
    ("10+ deals", DealExperienceBracket::TenPlus),
];

impl DealExperienceBracket {
    pub fn parse(label: &str) -> Self {
        if let Some(bracket) = lookup(DEAL_EXPERIENCE_LABELS, label) {
            return bracket;
        }

        // "10+" shares its first digit with "1-2", so it must be checked first.
        let trimmed = label.trim();
        if trimmed.starts_with("10") {
            Self::TenPlus
        } else if trimmed.starts_with('0') {
            Self::FirstDeal
        } else if trimmed.starts_with('1') {
            Self::OneToTwo
        } else if trimmed.starts_with('3') {
            Self::ThreeToFive
        } else if trimmed.starts_with('6') {
            Self::SixToNine
        } else {
            Self::Unrecognized
        }
    }

    /// Representative deal count used against `minDeals24Months`.
    pub fn deal_count(self) -> u32 {
        match self {
            Self::FirstDeal | Self::Unrecognized => 0,
            Self::OneToTwo => 1,
            Self::ThreeToFive => 3,
            Self::SixToNine => 6,
            Self::TenPlus => 10,
        }
    }

    pub fn label(self) -> &'static str {
        DEAL_EXPERIENCE_LABELS
            .iter()
            .find(|(_, bracket)| *bracket == self)
            .map(|(label, _)| *label)
            .unwrap_or("Not provided")
    }
}

impl<'de> Deserialize<'de> for DealExperienceBracket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient_label(deserializer)?
            .map(|label| Self::parse(&label))
            .unwrap_or_default())
    }
}

impl From<String> for DealExperienceBracket {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DealExperienceBracket> for String {
    fn from(value: DealExperienceBracket) -> Self {
        value.label().to_string()
    }
}

/// Citizenship / residency status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum CitizenshipBracket {
    UsCitizen,
    PermanentResident,
    ForeignNational,
    #[default]
    OtherNotSure,
}

const CITIZENSHIP_LABELS: &[(&str, CitizenshipBracket)] = &[
    ("US Citizen", CitizenshipBracket::UsCitizen),
    (
        "Permanent Resident (Green Card)",
        CitizenshipBracket::PermanentResident,
    ),
    ("Foreign National", CitizenshipBracket::ForeignNational),
    ("Other / Not Sure", CitizenshipBracket::OtherNotSure),
];

impl CitizenshipBracket {
    pub fn parse(label: &str) -> Self {
        lookup(CITIZENSHIP_LABELS, label).unwrap_or(Self::OtherNotSure)
    }

    pub fn is_us_resident(self) -> bool {
        matches!(self, Self::UsCitizen | Self::PermanentResident)
    }

    pub fn label(self) -> &'static str {
        CITIZENSHIP_LABELS
            .iter()
            .find(|(_, bracket)| *bracket == self)
            .map(|(label, _)| *label)
            .unwrap_or("Other / Not Sure")
    }
}

impl<'de> Deserialize<'de> for CitizenshipBracket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient_label(deserializer)?
            .map(|label| Self::parse(&label))
            .unwrap_or_default())
    }
}

impl From<String> for CitizenshipBracket {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CitizenshipBracket> for String {
    fn from(value: CitizenshipBracket) -> Self {
        value.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_labels_map_to_floors() {
        assert_eq!(CreditScoreBracket::parse("760 or higher").floor(), 760);
        assert_eq!(CreditScoreBracket::parse("720\u{2013}759").floor(), 720);
        assert_eq!(CreditScoreBracket::parse("680-719").floor(), 680);
        assert_eq!(CreditScoreBracket::parse("Below 620").floor(), 0);
        assert_eq!(CreditScoreBracket::parse("Not sure").floor(), 0);
    }

    #[test]
    fn unlisted_credit_labels_keep_leading_score() {
        assert_eq!(
            CreditScoreBracket::parse("700+"),
            CreditScoreBracket::Unlisted(700)
        );
        assert_eq!(CreditScoreBracket::parse("excellent"), CreditScoreBracket::NotSure);
        assert_eq!(CreditScoreBracket::parse("").floor(), 0);
    }

    #[test]
    fn deal_brackets_check_ten_plus_before_one() {
        assert_eq!(DealExperienceBracket::parse("10+").deal_count(), 10);
        assert_eq!(DealExperienceBracket::parse("10+ deals").deal_count(), 10);
        assert_eq!(DealExperienceBracket::parse("1\u{2013}2 deals").deal_count(), 1);
        assert_eq!(DealExperienceBracket::parse("3-5 deals").deal_count(), 3);
        assert_eq!(DealExperienceBracket::parse("6\u{2013}9 deals").deal_count(), 6);
        assert_eq!(
            DealExperienceBracket::parse("0 \u{2014} First deal").deal_count(),
            0
        );
        assert_eq!(DealExperienceBracket::parse("lots").deal_count(), 0);
    }

    #[test]
    fn citizenship_residency() {
        assert!(CitizenshipBracket::parse("US Citizen").is_us_resident());
        assert!(CitizenshipBracket::parse("permanent resident (green card)").is_us_resident());
        assert!(!CitizenshipBracket::parse("Foreign National").is_us_resident());
        assert!(!CitizenshipBracket::parse("Other / Not Sure").is_us_resident());
        assert!(!CitizenshipBracket::parse("Martian").is_us_resident());
    }

    #[test]
    fn brackets_deserialize_from_form_labels() {
        let credit: CreditScoreBracket =
            serde_json::from_str("\"760 or higher\"").expect("credit label");
        assert_eq!(credit, CreditScoreBracket::From760);
        let deals: DealExperienceBracket =
            serde_json::from_str("\"3\u{2013}5 deals\"").expect("deal label");
        assert_eq!(deals, DealExperienceBracket::ThreeToFive);
        assert_eq!(
            serde_json::to_string(&CitizenshipBracket::UsCitizen).expect("serialize"),
            "\"US Citizen\""
        );
    }

    #[test]
    fn non_string_brackets_fall_back_to_conservative_values() {
        let credit: CreditScoreBracket = serde_json::from_str("720").expect("numeric credit");
        assert_eq!(credit, CreditScoreBracket::NotSure);
        assert_eq!(credit.floor(), 0);
        let deals: DealExperienceBracket = serde_json::from_str("null").expect("null deals");
        assert_eq!(deals.deal_count(), 0);
        let citizenship: CitizenshipBracket =
            serde_json::from_str("{\"label\":\"US Citizen\"}").expect("object citizenship");
        assert!(!citizenship.is_us_resident());
    }
}
