//! # Unit Converter Module
//!
//! Converts a quantity in a recipe unit to grams. Weight units convert
//! directly; volume units go through millilitres and the ingredient's
//! density. Anything else is unrecognized and yields no weight.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use crate::density_table::{lookup_count_weight, lookup_density};

pub const TEASPOON_ML: f64 = 5.0;
pub const TABLESPOON_ML: f64 = 15.0;
pub const CUP_ML: f64 = 240.0;
pub const FLUID_OUNCE_ML: f64 = 30.0;
pub const PINT_ML: f64 = 480.0;
pub const QUART_ML: f64 = 960.0;
pub const GALLON_ML: f64 = 3840.0;
pub const LITER_ML: f64 = 1000.0;
pub const BUTTER_STICK_ML: f64 = 120.0;

pub const GRAMS_PER_OUNCE: f64 = 28.3495;
pub const GRAMS_PER_POUND: f64 = 453.592;

/// Weight unit spelling -> grams per unit
pub const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("g", 1.0),
    ("gram", 1.0),
    ("grams", 1.0),
    ("kg", 1000.0),
    ("kilogram", 1000.0),
    ("kilograms", 1000.0),
    ("mg", 0.001),
    ("milligram", 0.001),
    ("milligrams", 0.001),
    ("oz", GRAMS_PER_OUNCE),
    ("ounce", GRAMS_PER_OUNCE),
    ("ounces", GRAMS_PER_OUNCE),
    ("lb", GRAMS_PER_POUND),
    ("lbs", GRAMS_PER_POUND),
    ("pound", GRAMS_PER_POUND),
    ("pounds", GRAMS_PER_POUND),
];

/// Volume unit spelling -> millilitres per unit
pub const VOLUME_UNITS: &[(&str, f64)] = &[
    ("t", TEASPOON_ML),
    ("tsp", TEASPOON_ML),
    ("teaspoon", TEASPOON_ML),
    ("teaspoons", TEASPOON_ML),
    ("tbsp", TABLESPOON_ML),
    ("tbs", TABLESPOON_ML),
    ("tablespoon", TABLESPOON_ML),
    ("tablespoons", TABLESPOON_ML),
    ("c", CUP_ML),
    ("cup", CUP_ML),
    ("cups", CUP_ML),
    ("fl oz", FLUID_OUNCE_ML),
    ("fluid ounce", FLUID_OUNCE_ML),
    ("fluid ounces", FLUID_OUNCE_ML),
    ("pt", PINT_ML),
    ("pint", PINT_ML),
    ("pints", PINT_ML),
    ("qt", QUART_ML),
    ("quart", QUART_ML),
    ("quarts", QUART_ML),
    ("gal", GALLON_ML),
    ("gallon", GALLON_ML),
    ("gallons", GALLON_ML),
    ("ml", 1.0),
    ("milliliter", 1.0),
    ("milliliters", 1.0),
    ("millilitre", 1.0),
    ("millilitres", 1.0),
    ("l", LITER_ML),
    ("liter", LITER_ML),
    ("liters", LITER_ML),
    ("litre", LITER_ML),
    ("litres", LITER_ML),
    ("stick", BUTTER_STICK_ML),
    ("sticks", BUTTER_STICK_ML),
];

static WEIGHT_INDEX: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| WEIGHT_UNITS.iter().copied().collect());

static VOLUME_INDEX: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| VOLUME_UNITS.iter().copied().collect());

/// Classification of a unit token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitKind {
    /// Weight unit with its grams-per-unit factor
    Weight(f64),
    /// Volume unit with its millilitres-per-unit factor
    Volume(f64),
    /// Not a unit the converter knows
    Unknown,
}

impl UnitKind {
    /// Check if this is a weight unit
    pub fn is_weight(&self) -> bool {
        matches!(self, UnitKind::Weight(_))
    }

    /// Check if this is a volume unit
    pub fn is_volume(&self) -> bool {
        matches!(self, UnitKind::Volume(_))
    }
}

/// Classify a unit token.
///
/// A bare upper-case `"T"` means tablespoon; every other token is matched
/// case-insensitively, so a lower-case `"t"` means teaspoon.
///
/// # Examples
///
/// ```rust
/// use bakehouse::unit_converter::{classify_unit, UnitKind};
///
/// assert_eq!(classify_unit("T"), UnitKind::Volume(15.0));
/// assert_eq!(classify_unit("t"), UnitKind::Volume(5.0));
/// assert_eq!(classify_unit("Oz"), UnitKind::Weight(28.3495));
/// assert_eq!(classify_unit("handful"), UnitKind::Unknown);
/// ```
pub fn classify_unit(unit: &str) -> UnitKind {
    let trimmed = unit.trim();
    if trimmed == "T" {
        return UnitKind::Volume(TABLESPOON_ML);
    }

    let lower = trimmed.to_lowercase();
    let key = lower.trim_end_matches('.');

    if let Some(grams) = WEIGHT_INDEX.get(key) {
        UnitKind::Weight(*grams)
    } else if let Some(ml) = VOLUME_INDEX.get(key) {
        UnitKind::Volume(*ml)
    } else {
        UnitKind::Unknown
    }
}

/// Convert a quantity of `unit` of `ingredient_name` to grams.
///
/// Volume units need a density for the ingredient; when none can be found
/// the conversion fails rather than assuming water.
pub fn convert_to_grams(quantity: f64, unit: &str, ingredient_name: &str) -> Option<f64> {
    match classify_unit(unit) {
        UnitKind::Weight(grams_per_unit) => Some(quantity * grams_per_unit),
        UnitKind::Volume(ml_per_unit) => match lookup_density(ingredient_name) {
            Some(density) => Some(quantity * ml_per_unit * density),
            None => {
                debug!(ingredient = %ingredient_name, unit = %unit, "No density for volume conversion");
                None
            }
        },
        UnitKind::Unknown => {
            debug!(unit = %unit, "Unrecognized unit");
            None
        }
    }
}

/// Weight of `quantity` whole items of a counted ingredient ("3 eggs")
pub fn count_weight_grams(quantity: f64, ingredient_name: &str) -> Option<f64> {
    lookup_count_weight(ingredient_name).map(|grams_each| quantity * grams_each)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tables_do_not_overlap() {
        for (token, _) in WEIGHT_UNITS {
            assert!(!VOLUME_INDEX.contains_key(token), "{token} is both weight and volume");
        }
    }

    #[test]
    fn test_classify_is_case_insensitive_except_t() {
        assert_eq!(classify_unit(" CUPS "), UnitKind::Volume(CUP_ML));
        assert_eq!(classify_unit("tsp."), UnitKind::Volume(TEASPOON_ML));
        assert_eq!(classify_unit("T"), UnitKind::Volume(TABLESPOON_ML));
        assert_eq!(classify_unit("t"), UnitKind::Volume(TEASPOON_ML));
        assert!(classify_unit("KG").is_weight());
        assert!(classify_unit("stick").is_volume());
    }

    #[test]
    fn test_weight_conversion_ignores_density() {
        assert_eq!(convert_to_grams(2.0, "kg", "unicorn tears"), Some(2000.0));
        let grams = convert_to_grams(1.0, "lb", "butter").unwrap();
        assert!((grams - 453.592).abs() < 1e-9);
    }

    #[test]
    fn test_volume_conversion_uses_density() {
        let grams = convert_to_grams(1.0, "cup", "all-purpose flour").unwrap();
        assert!((grams - 125.04).abs() < 1e-9);
        let grams = convert_to_grams(1.0, "stick", "unsalted butter").unwrap();
        assert!((grams - 109.32).abs() < 1e-9);
    }

    #[test]
    fn test_volume_without_density_fails() {
        assert_eq!(convert_to_grams(1.0, "cup", "unicorn tears"), None);
    }

    #[test]
    fn test_unknown_unit_fails() {
        assert_eq!(convert_to_grams(2.0, "handful", "flour"), None);
    }

    #[test]
    fn test_count_weight() {
        assert_eq!(count_weight_grams(3.0, "eggs"), Some(150.0));
        assert_eq!(count_weight_grams(2.0, "bread flour"), None);
    }
}
