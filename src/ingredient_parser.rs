//! # Ingredient Parser
//!
//! Turns a free-form recipe line such as `"2 1/4 cups all-purpose flour, sifted"`
//! into a [`ParsedIngredient`] with quantity, unit, name, preparation notes
//! and, where possible, a gram weight.
//!
//! ## Features
//!
//! - Whole numbers, decimals, fractions (`1/2`) and mixed numbers (`2 1/4`)
//! - Unicode vulgar fractions (`½`, `2⅔`)
//! - Weight and volume units, longest spelling first (`tablespoon` before `t`)
//! - Vague amounts ("to taste", "as needed", "a pinch of", "a dash of")
//! - Count-based weights for unit-less lines ("3 eggs")
//!
//! Parsing never fails. Anything that cannot be understood ends up in the
//! ingredient name, and missing information is left as `None`.
//!
//! Everything after the first comma becomes the preparation notes, even when
//! the comma belongs to a longer ingredient description.
//!
//! ## Usage
//!
//! ```rust
//! use bakehouse::ingredient_parser::parse_ingredient_list;
//!
//! let text = "500 g bread flour\n350 g water\n\n10 g salt";
//! let parsed = parse_ingredient_list(text);
//!
//! assert_eq!(parsed.len(), 3);
//! assert_eq!(parsed[1].ingredient_name, "water");
//! ```

use tracing::{debug, trace};

use crate::ingredient_model::{is_flour_name, ParsedIngredient};
use crate::measurement_patterns::{
    BARE_FRACTION_REGEX, LEADING_NUMBER_REGEX, LEADING_OF_REGEX, MIXED_FRACTION_REGEX,
    UNIT_TOKEN_REGEX, VAGUE_QUANTITY_REGEX,
};
use crate::text_processing::{collapse_whitespace, normalize_name, replace_vulgar_fractions};
use crate::unit_converter::{convert_to_grams, count_weight_grams};

/// Parse every non-blank line of `text`, in order
pub fn parse_ingredient_list(text: &str) -> Vec<ParsedIngredient> {
    let ingredients: Vec<ParsedIngredient> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_ingredient)
        .collect();

    debug!(
        lines = ingredients.len(),
        weighed = ingredients.iter().filter(|i| i.has_weight()).count(),
        "Parsed ingredient list"
    );

    ingredients
}

/// Parse a single ingredient line
pub fn parse_ingredient(raw: &str) -> ParsedIngredient {
    let (main_part, prep_notes) = split_prep_notes(raw);
    let main_part = collapse_whitespace(&replace_vulgar_fractions(main_part));

    let (quantity, rest) = take_quantity(&main_part);
    let (quantity, unit, remainder) = match quantity {
        // A measured line keeps its amount; a trailing "as needed" only leaves the name
        Some(quantity) => {
            let (unit, rest) = take_unit(rest.trim_start());
            let rest = strip_vague_quantity(rest).unwrap_or_else(|| rest.to_string());
            (Some(quantity), unit, rest)
        }
        None => match strip_vague_quantity(&main_part) {
            Some(remainder) => (None, None, remainder),
            None => {
                let (unit, rest) = take_unit(main_part.trim_start());
                (None, unit, rest.to_string())
            }
        },
    };

    let ingredient_name = resolve_name(&remainder, &main_part, raw);
    let unit_grams = estimate_grams(quantity, unit.as_deref(), &ingredient_name);

    let ingredient = ParsedIngredient {
        raw_text: raw.to_string(),
        quantity,
        unit,
        is_flour: is_flour_name(&ingredient_name),
        ingredient_name,
        prep_notes,
        unit_grams,
    };

    if ingredient.has_quantity() && !ingredient.has_weight() {
        debug!(raw = %raw, ingredient = %ingredient.ingredient_name, "No gram weight for ingredient");
    }

    ingredient
}

/// Split on the first comma into the main part and optional notes
fn split_prep_notes(raw: &str) -> (&str, Option<String>) {
    match raw.split_once(',') {
        Some((main, notes)) => {
            let notes = collapse_whitespace(notes);
            (main.trim(), (!notes.is_empty()).then_some(notes))
        }
        None => (raw.trim(), None),
    }
}

/// Remove a vague-amount phrase, returning what is left of the line
fn strip_vague_quantity(text: &str) -> Option<String> {
    let found = VAGUE_QUANTITY_REGEX.find(text)?;
    trace!(phrase = found.as_str(), "Vague quantity phrase");
    let remainder = format!("{} {}", &text[..found.start()], &text[found.end()..]);
    Some(collapse_whitespace(&remainder))
}

fn fraction_value(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Take a leading fraction, number or mixed number off `text`
fn take_quantity(text: &str) -> (Option<f64>, &str) {
    if let Some(caps) = BARE_FRACTION_REGEX.captures(text) {
        if let Some(value) = fraction_value(&caps[1], &caps[2]) {
            let end = caps.get(0).map_or(0, |m| m.end());
            return (Some(value), &text[end..]);
        }
    }

    let Some(number) = LEADING_NUMBER_REGEX.find(text) else {
        return (None, text);
    };
    let Ok(mut value) = number.as_str().parse::<f64>() else {
        return (None, text);
    };
    let mut rest = &text[number.end()..];

    if let Some(caps) = MIXED_FRACTION_REGEX.captures(rest) {
        if let Some(fraction) = fraction_value(&caps[1], &caps[2]) {
            value += fraction;
            let end = caps.get(0).map_or(0, |m| m.end());
            rest = &rest[end..];
        }
    }

    (Some(value), rest)
}

/// Take a leading unit token (and a following "of") off `text`
fn take_unit(text: &str) -> (Option<String>, &str) {
    let Some(caps) = UNIT_TOKEN_REGEX.captures(text) else {
        return (None, text);
    };
    let Some(token) = caps.get(1).map(|m| m.as_str()) else {
        return (None, text);
    };

    // "T" is tablespoon, "t" is teaspoon; keep the difference visible
    let unit = if token == "T" {
        token.to_string()
    } else {
        token.to_lowercase()
    };

    let end = caps.get(0).map_or(0, |m| m.end());
    let mut rest = &text[end..];
    if let Some(of) = LEADING_OF_REGEX.find(rest) {
        rest = &rest[of.end()..];
    }

    (Some(unit), rest)
}

/// First non-empty of: the unparsed remainder, the whole main part, the raw line
fn resolve_name(remainder: &str, main_part: &str, raw: &str) -> String {
    [remainder, main_part, raw]
        .into_iter()
        .map(normalize_name)
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}

fn estimate_grams(quantity: Option<f64>, unit: Option<&str>, name: &str) -> Option<f64> {
    match (quantity, unit) {
        (Some(quantity), Some(unit)) => convert_to_grams(quantity, unit, name),
        (Some(quantity), None) => count_weight_grams(quantity, name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_parse_mixed_number_with_notes() {
        let result = parse_ingredient("2 1/4 cups all-purpose flour, sifted");
        assert_eq!(result.raw_text, "2 1/4 cups all-purpose flour, sifted");
        assert_eq!(result.quantity, Some(2.25));
        assert_eq!(result.unit, Some("cups".to_string()));
        assert_eq!(result.ingredient_name, "all-purpose flour");
        assert_eq!(result.prep_notes, Some("sifted".to_string()));
        assert!(result.is_flour);
        assert_close(result.unit_grams, 2.25 * 240.0 * 0.521);
    }

    #[test]
    fn test_parse_to_taste() {
        let result = parse_ingredient("salt to taste");
        assert_eq!(result.quantity, None);
        assert_eq!(result.unit, None);
        assert_eq!(result.ingredient_name, "salt");
        assert_eq!(result.unit_grams, None);
    }

    #[test]
    fn test_trailing_vague_phrase_keeps_measured_amount() {
        let result = parse_ingredient("2 tbsp water as needed");
        assert_eq!(result.quantity, Some(2.0));
        assert_eq!(result.unit, Some("tbsp".to_string()));
        assert_eq!(result.ingredient_name, "water");
        assert_eq!(result.unit_grams, Some(30.0));

        let eggs = parse_ingredient("2 eggs to taste");
        assert_eq!(eggs.ingredient_name, "eggs");
        assert_eq!(eggs.unit_grams, Some(100.0));
    }

    #[test]
    fn test_parse_leading_vague_phrase() {
        let result = parse_ingredient("A pinch of Nutmeg");
        assert_eq!(result.quantity, None);
        assert_eq!(result.ingredient_name, "nutmeg");
    }

    #[test]
    fn test_vague_phrase_alone_keeps_main_part() {
        let result = parse_ingredient("as needed");
        assert_eq!(result.ingredient_name, "as needed");
        assert_eq!(result.quantity, None);
    }

    #[test]
    fn test_parse_bare_fraction() {
        let result = parse_ingredient("1/2 tsp baking soda");
        assert_eq!(result.quantity, Some(0.5));
        assert_eq!(result.unit, Some("tsp".to_string()));
        assert_eq!(result.ingredient_name, "baking soda");
        assert_close(result.unit_grams, 0.5 * 5.0 * 1.2);
    }

    #[test]
    fn test_parse_decimal_and_attached_unit() {
        let result = parse_ingredient("1.5kg Bread Flour");
        assert_eq!(result.quantity, Some(1.5));
        assert_eq!(result.unit, Some("kg".to_string()));
        assert_eq!(result.ingredient_name, "bread flour");
        assert_eq!(result.unit_grams, Some(1500.0));
    }

    #[test]
    fn test_parse_vulgar_fraction() {
        let result = parse_ingredient("1½ cups milk");
        assert_eq!(result.quantity, Some(1.5));
        assert_eq!(result.unit, Some("cups".to_string()));
        assert_eq!(result.ingredient_name, "milk");
    }

    #[test]
    fn test_longest_unit_wins() {
        let result = parse_ingredient("2 tablespoons sugar");
        assert_eq!(result.unit, Some("tablespoons".to_string()));
        assert_eq!(result.ingredient_name, "sugar");
    }

    #[test]
    fn test_capital_t_is_tablespoon() {
        let tablespoon = parse_ingredient("1 T butter");
        let teaspoon = parse_ingredient("1 t butter");
        assert_eq!(tablespoon.unit, Some("T".to_string()));
        assert_eq!(teaspoon.unit, Some("t".to_string()));
        assert_close(tablespoon.unit_grams, 15.0 * 0.911);
        assert_close(teaspoon.unit_grams, 5.0 * 0.911);
    }

    #[test]
    fn test_strips_of_after_unit() {
        let result = parse_ingredient("1 cup of water");
        assert_eq!(result.ingredient_name, "water");
        assert_eq!(result.unit_grams, Some(240.0));
    }

    #[test]
    fn test_count_based_weight() {
        let result = parse_ingredient("3 large eggs");
        assert_eq!(result.quantity, Some(3.0));
        assert_eq!(result.unit, None);
        assert_eq!(result.ingredient_name, "large eggs");
        assert_eq!(result.unit_grams, Some(150.0));
    }

    #[test]
    fn test_no_quantity() {
        let result = parse_ingredient("Fresh rosemary");
        assert_eq!(result.quantity, None);
        assert_eq!(result.unit, None);
        assert_eq!(result.ingredient_name, "fresh rosemary");
        assert_eq!(result.unit_grams, None);
    }

    #[test]
    fn test_unknown_density_leaves_weight_empty() {
        let result = parse_ingredient("2 cups unicorn tears");
        assert_eq!(result.quantity, Some(2.0));
        assert_eq!(result.unit, Some("cups".to_string()));
        assert_eq!(result.unit_grams, None);
    }

    #[test]
    fn test_first_comma_split_is_preserved() {
        let result = parse_ingredient("1 cup cheese (cheddar, grated), divided");
        assert_eq!(result.ingredient_name, "cheese (cheddar");
        assert_eq!(result.prep_notes, Some("grated), divided".to_string()));
    }

    #[test]
    fn test_empty_notes_become_none() {
        let result = parse_ingredient("100 g rye flour,  ");
        assert_eq!(result.prep_notes, None);
        assert_eq!(result.ingredient_name, "rye flour");
    }

    #[test]
    fn test_name_falls_back_to_main_part() {
        let result = parse_ingredient("2 cups");
        assert_eq!(result.quantity, Some(2.0));
        assert_eq!(result.ingredient_name, "2 cups");
    }

    #[test]
    fn test_zero_denominator_is_not_a_fraction() {
        let result = parse_ingredient("1/0 cup flour");
        assert_eq!(result.quantity, Some(1.0));
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_parse_ingredient_list_skips_blank_lines() {
        let parsed = parse_ingredient_list("2 cups flour\n\n   \n1 tbsp salt\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].ingredient_name, "flour");
        assert_eq!(parsed[1].ingredient_name, "salt");
    }
}
