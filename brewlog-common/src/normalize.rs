//! External-record normalization
//!
//! Converts heterogeneous, partially-null external records (imported catalog
//! rows, enrichment-service replies) into canonical bean fields. Fields with
//! a documented default fall back silently; price and weight have no default
//! and stay `None` for the consuming form's required-field validation to
//! reject.
//!
//! The dose/yield/time grammar is deliberately narrow. Keep it that way:
//! records that do not match the exact shape take the fallback triple, which
//! is a default, not an error.

use crate::models::{dedupe_notes, DEFAULT_ROAST_LEVEL};
use crate::units;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback brew parameters for unparseable dose/yield/time strings
pub const FALLBACK_GRAMS_IN: f64 = 18.0;
pub const FALLBACK_ML_OUT: f64 = 36.0;
pub const FALLBACK_BREW_TIME: i64 = 25;

/// Fallback grind setting for records that carry none
pub const FALLBACK_GRIND_SIZE: f64 = 15.0;

/// Matches "<dose>g in, <yield>g out in <time>s" where time may be a
/// "low-high" range (only the lower bound is kept)
static BREW_PARAMS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)g in,\s*(\d+(?:\.\d+)?)g out in\s*(\d+)(?:-\d+)?s\s*$")
        .expect("brew params regex is valid")
});

/// Decomposed dose/yield/time triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrewParams {
    pub grams_in: f64,
    pub ml_out: f64,
    pub brew_time: i64,
}

impl Default for BrewParams {
    fn default() -> Self {
        Self {
            grams_in: FALLBACK_GRAMS_IN,
            ml_out: FALLBACK_ML_OUT,
            brew_time: FALLBACK_BREW_TIME,
        }
    }
}

/// Parse a combined dose/yield/time string.
///
/// Any input not matching the exact grammar yields the fallback triple
/// (18 g in, 36 out, 25 s).
pub fn parse_brew_params(text: &str) -> BrewParams {
    let Some(caps) = BREW_PARAMS_RE.captures(text) else {
        tracing::debug!(input = %text, "Brew params did not match grammar, using fallback");
        return BrewParams::default();
    };

    // Captures are digit-only by construction; parse cannot fail
    let grams_in = caps[1].parse().unwrap_or(FALLBACK_GRAMS_IN);
    let ml_out = caps[2].parse().unwrap_or(FALLBACK_ML_OUT);
    let brew_time = caps[3].parse().unwrap_or(FALLBACK_BREW_TIME);

    BrewParams {
        grams_in,
        ml_out,
        brew_time,
    }
}

/// Parse a price string, stripping one leading currency symbol.
///
/// Returns `None` when the remaining text is not numeric; the caller
/// validates downstream.
pub fn parse_price(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let stripped = trimmed
        .strip_prefix(['$', '€', '£', '¥'])
        .unwrap_or(trimmed)
        .trim();
    stripped.parse::<f64>().ok()
}

/// Convert an ounce weight to whole grams for storage
pub fn normalize_weight_oz(oz: f64) -> f64 {
    units::oz_to_grams(oz).round()
}

/// Apply the roast-level fallback.
///
/// Missing or empty input becomes "Medium"; anything else passes through
/// unvalidated, so unknown vocabulary propagates as written.
pub fn normalize_roast_level(value: Option<&str>) -> String {
    match value {
        Some(level) if !level.trim().is_empty() => level.to_string(),
        _ => DEFAULT_ROAST_LEVEL.to_string(),
    }
}

/// Parse a grind size from a loosely-typed field, defaulting to 15
pub fn normalize_grind_size(value: Option<&Value>) -> f64 {
    parse_loose_number(value).unwrap_or(FALLBACK_GRIND_SIZE)
}

/// Extract a number from a JSON field that may be a number, a numeric
/// string, or a price string with a currency symbol
pub fn parse_loose_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_price(s),
        _ => None,
    }
}

/// Loosely-typed external record as returned by catalog imports or the
/// enrichment service. Every field may be absent or carry the wrong type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalBeanRecord {
    pub name: Option<String>,
    pub roaster: Option<String>,
    pub origin: Option<String>,
    pub roast_level: Option<String>,
    /// Number or price string, e.g. "$18.50"
    pub price: Option<Value>,
    /// Bag weight in ounces; number or numeric string
    pub weight_oz: Option<Value>,
    /// Combined dose/yield/time string, e.g. "18g in, 36g out in 25s"
    pub brew_params: Option<String>,
    pub grind_size: Option<Value>,
    pub temperature: Option<f64>,
    pub notes: Option<Vec<String>>,
    /// Free-text provenance strings for the citation extractor
    pub sources: Option<Vec<String>>,
}

/// Canonical bean fields after normalization.
///
/// `price` and `weight` stay optional: the external payload defines no
/// default for them, and the consuming form's required-field validation is
/// the rejection point, not this component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedBean {
    pub name: String,
    pub roaster: String,
    pub origin: String,
    pub roast_level: String,
    pub price: Option<f64>,
    /// Grams, rounded to the nearest whole gram
    pub weight: Option<f64>,
    pub grams_in: f64,
    pub ml_out: f64,
    pub brew_time: i64,
    pub grind_size: f64,
    pub temperature: Option<f64>,
    pub notes: Vec<String>,
}

/// Normalize one external record into canonical bean fields
pub fn normalize_external(record: &ExternalBeanRecord) -> NormalizedBean {
    let brew = record
        .brew_params
        .as_deref()
        .map(parse_brew_params)
        .unwrap_or_default();

    NormalizedBean {
        name: record.name.clone().unwrap_or_default(),
        roaster: record.roaster.clone().unwrap_or_default(),
        origin: record.origin.clone().unwrap_or_default(),
        roast_level: normalize_roast_level(record.roast_level.as_deref()),
        price: parse_loose_number(record.price.as_ref()),
        weight: parse_loose_number(record.weight_oz.as_ref()).map(normalize_weight_oz),
        grams_in: brew.grams_in,
        ml_out: brew.ml_out,
        brew_time: brew.brew_time,
        grind_size: normalize_grind_size(record.grind_size.as_ref()),
        temperature: record.temperature,
        notes: dedupe_notes(record.notes.clone().unwrap_or_default()),
    }
}
