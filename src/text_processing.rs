//! # Text Processing Module
//!
//! Normalization helpers shared by the parser, the lookup tables and the
//! aggregators.
//!
//! ## Features
//!
//! - Whitespace collapsing and lower-casing of ingredient names
//! - Replacement of Unicode vulgar fractions (½, ⅔, ...) with decimals
//! - Case-insensitive name ordering for aggregated lists

use std::cmp::Ordering;

use crate::measurement_patterns::VULGAR_FRACTION_REGEX;

/// Decimal value of each supported vulgar-fraction glyph
pub const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('⅓', 0.333),
    ('⅔', 0.667),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 0.167),
    ('⅚', 0.833),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Collapse runs of whitespace into single spaces and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-case and whitespace-collapse a name for table lookups and grouping
///
/// # Examples
///
/// ```rust
/// use bakehouse::text_processing::normalize_name;
///
/// assert_eq!(normalize_name("  All-Purpose   Flour "), "all-purpose flour");
/// ```
pub fn normalize_name(name: &str) -> String {
    collapse_whitespace(&name.to_lowercase())
}

/// Decimal value for a vulgar-fraction glyph
pub fn vulgar_fraction_value(glyph: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(candidate, _)| *candidate == glyph)
        .map(|(_, value)| *value)
}

/// Replace vulgar-fraction glyphs with decimal text.
///
/// A glyph directly preceded by a whole number (with or without a space)
/// is merged into it, so `"2½ cups"` and `"2 ½ cups"` both become `"2.5 cups"`.
/// Whitespace around the replacement is collapsed.
///
/// # Examples
///
/// ```rust
/// use bakehouse::text_processing::replace_vulgar_fractions;
///
/// assert_eq!(replace_vulgar_fractions("1⅔cups milk"), "1.667 cups milk");
/// assert_eq!(replace_vulgar_fractions("½ tsp salt"), "0.5 tsp salt");
/// ```
pub fn replace_vulgar_fractions(text: &str) -> String {
    if !text.chars().any(|c| vulgar_fraction_value(c).is_some()) {
        return text.to_string();
    }

    let replaced = VULGAR_FRACTION_REGEX.replace_all(text, |caps: &regex::Captures| {
        let whole = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        let fraction = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .and_then(vulgar_fraction_value)
            .unwrap_or(0.0);
        format!(" {} ", format_decimal(whole + fraction, 3))
    });

    collapse_whitespace(&replaced)
}

/// Format a number with at most `places` decimals, trimming trailing zeros
///
/// # Examples
///
/// ```rust
/// use bakehouse::text_processing::format_decimal;
///
/// assert_eq!(format_decimal(2.5, 3), "2.5");
/// assert_eq!(format_decimal(281.0, 2), "281");
/// ```
pub fn format_decimal(value: f64, places: usize) -> String {
    let text = format!("{value:.places$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        text
    }
}

/// Case-insensitive ordering for display names, falling back to byte order
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  bread \t flour\n"), "bread flour");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_vulgar_fraction_values_are_fixed_constants() {
        assert_eq!(vulgar_fraction_value('⅔'), Some(0.667));
        assert_eq!(vulgar_fraction_value('⅛'), Some(0.125));
        assert_eq!(vulgar_fraction_value('x'), None);
    }

    #[test]
    fn test_replace_standalone_fraction() {
        assert_eq!(replace_vulgar_fractions("¾ cup sugar"), "0.75 cup sugar");
    }

    #[test]
    fn test_replace_mixed_fraction() {
        assert_eq!(replace_vulgar_fractions("2½ cups flour"), "2.5 cups flour");
        assert_eq!(replace_vulgar_fractions("1 ¼  cups flour"), "1.25 cups flour");
    }

    #[test]
    fn test_replace_without_glyph_is_untouched() {
        assert_eq!(replace_vulgar_fractions("2  cups flour"), "2  cups flour");
    }

    #[test]
    fn test_format_decimal_trims() {
        assert_eq!(format_decimal(47.5, 2), "47.5");
        assert_eq!(format_decimal(1.0, 3), "1");
        assert_eq!(format_decimal(0.0001, 2), "0");
    }

    #[test]
    fn test_compare_names_is_case_insensitive() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zest", "yeast"), Ordering::Greater);
    }
}
