//! Parsing helpers for the loosely formatted numbers that arrive from the
//! application form and the pricing sheet ("$200,000", "11.5%", "").

use serde::{Deserialize, Deserializer};

/// Strips currency symbols, thousands separators, percent signs and whitespace,
/// then parses what is left. Empty or non-numeric input yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Whole currency units. Negative, empty and malformed input all collapse to 0.
pub fn parse_currency(raw: &str) -> u64 {
    parse_number(raw).map(whole_units).unwrap_or(0)
}

/// Percentage points (e.g. `"11.5%"` -> `11.5`). Malformed input yields 0.
pub fn parse_percent(raw: &str) -> f64 {
    parse_number(raw).filter(|value| *value > 0.0).unwrap_or(0.0)
}

/// Integer counts such as months or score minimums. Leading text after the
/// number is ignored so "18 months" parses as 18.
pub fn parse_count(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return parse_number(raw).map(|value| whole_units(value).min(u32::MAX as u64) as u32);
    }
    digits.parse().ok()
}

fn whole_units(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else {
        value.floor() as u64
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

pub(crate) fn deserialize_currency<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(value)) => whole_units(value),
        Some(RawAmount::Text(text)) => parse_currency(&text),
        None => 0,
    })
}

pub(crate) fn deserialize_optional_months<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(value)) if value > 0.0 => Some(value.floor() as u32),
        Some(RawAmount::Text(text)) => parse_count(&text).filter(|months| *months > 0),
        _ => None,
    })
}
