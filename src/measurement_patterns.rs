//! # Measurement Patterns Module
//!
//! Regex patterns used to pull quantities, units and vague amounts off the
//! front of an ingredient line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::unit_converter::{VOLUME_UNITS, WEIGHT_UNITS};

/// Phrases that stand in for a quantity ("salt to taste", "a pinch of nutmeg")
pub const VAGUE_QUANTITY_PATTERN: &str =
    r"(?i)\b(?:to taste|as needed|a pinch(?:\s+of)?|a dash(?:\s+of)?)\b";

/// Every unit spelling the converter understands, longest first so that
/// "tablespoons" wins over "tbsp" and "t".
pub fn unit_tokens_longest_first() -> Vec<&'static str> {
    let mut tokens: Vec<&'static str> = WEIGHT_UNITS
        .iter()
        .chain(VOLUME_UNITS.iter())
        .map(|(token, _)| *token)
        .collect();
    tokens.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    tokens.dedup();
    tokens
}

fn build_unit_pattern() -> String {
    let alternation = unit_tokens_longest_first()
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    // A unit must be followed by whitespace or the end of the text, optionally after a period
    format!(r"(?i)^({alternation})\.?(?:\s+|$)")
}

lazy_static! {
    pub static ref VULGAR_FRACTION_REGEX: Regex =
        Regex::new(r"(\d+)?\s*([½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])\s*")
            .expect("Vulgar fraction pattern should be valid");
    pub static ref BARE_FRACTION_REGEX: Regex =
        Regex::new(r"^(\d+)/(\d+)").expect("Bare fraction pattern should be valid");
    pub static ref LEADING_NUMBER_REGEX: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)").expect("Leading number pattern should be valid");
    pub static ref MIXED_FRACTION_REGEX: Regex =
        Regex::new(r"^\s+(\d+)/(\d+)").expect("Mixed fraction pattern should be valid");
    pub static ref VAGUE_QUANTITY_REGEX: Regex =
        Regex::new(VAGUE_QUANTITY_PATTERN).expect("Vague quantity pattern should be valid");
    pub static ref UNIT_TOKEN_REGEX: Regex =
        Regex::new(&build_unit_pattern()).expect("Unit token pattern should be valid");
    pub static ref LEADING_OF_REGEX: Regex =
        Regex::new(r"(?i)^of(?:\s+|$)").expect("Leading 'of' pattern should be valid");
}
