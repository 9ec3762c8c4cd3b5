//! # Density Table Module
//!
//! Static ingredient data for weight conversion: densities in grams per
//! millilitre, synonyms that resolve to a canonical density entry, and
//! per-item weights for ingredients counted rather than measured.
//!
//! Tables are ordered slices. The fuzzy substring fallback returns the first
//! entry that matches, so more specific names ("bread flour", "buttermilk")
//! are listed before names they contain ("butter", "salt").

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::trace;

use crate::text_processing::normalize_name;

/// Canonical ingredient name -> density in g/mL
pub const DENSITY_TABLE: &[(&str, f64)] = &[
    // Flours and meals
    ("all-purpose flour", 0.521),
    ("bread flour", 0.55),
    ("white whole wheat flour", 0.5),
    ("whole wheat flour", 0.508),
    ("rye flour", 0.43),
    ("spelt flour", 0.44),
    ("cake flour", 0.48),
    ("pastry flour", 0.45),
    ("almond flour", 0.4),
    ("rice flour", 0.66),
    ("semolina", 0.7),
    ("cornmeal", 0.6),
    ("cornstarch", 0.54),
    ("rolled oats", 0.34),
    // Sugars and syrups
    ("granulated sugar", 0.845),
    ("brown sugar", 0.93),
    ("powdered sugar", 0.51),
    ("honey", 1.42),
    ("maple syrup", 1.32),
    ("molasses", 1.41),
    // Dairy and eggs (buttermilk and peanut butter before butter, milks before milk)
    ("buttermilk", 1.03),
    ("peanut butter", 1.09),
    ("butter", 0.911),
    ("heavy cream", 0.994),
    ("sour cream", 1.0),
    ("cream cheese", 0.97),
    ("coconut milk", 0.97),
    ("milk", 1.03),
    ("yogurt", 1.04),
    ("egg white", 1.04),
    ("egg yolk", 1.03),
    ("egg", 1.03),
    // Fats
    ("vegetable oil", 0.92),
    ("olive oil", 0.91),
    ("coconut oil", 0.92),
    // Leaveners and flavourings
    ("instant yeast", 0.6),
    ("active dry yeast", 0.6),
    ("baking powder", 0.8),
    ("baking soda", 1.2),
    ("cocoa powder", 0.36),
    ("vanilla extract", 0.88),
    ("chocolate chips", 0.72),
    ("raisins", 0.63),
    // Liquids and salt, kept last: their names occur inside many other names
    ("water", 1.0),
    ("kosher salt", 0.6),
    ("sea salt", 1.1),
    ("salt", 1.217),
];

/// Synonym -> canonical name in `DENSITY_TABLE`
pub const ALIAS_TABLE: &[(&str, &str)] = &[
    ("ap flour", "all-purpose flour"),
    ("plain flour", "all-purpose flour"),
    ("white flour", "all-purpose flour"),
    ("flour", "all-purpose flour"),
    ("strong flour", "bread flour"),
    ("wholemeal flour", "whole wheat flour"),
    ("corn starch", "cornstarch"),
    ("cornflour", "cornstarch"),
    ("oats", "rolled oats"),
    ("sugar", "granulated sugar"),
    ("white sugar", "granulated sugar"),
    ("caster sugar", "granulated sugar"),
    ("light brown sugar", "brown sugar"),
    ("dark brown sugar", "brown sugar"),
    ("confectioners sugar", "powdered sugar"),
    ("confectioners' sugar", "powdered sugar"),
    ("icing sugar", "powdered sugar"),
    ("unsalted butter", "butter"),
    ("salted butter", "butter"),
    ("whole milk", "milk"),
    ("double cream", "heavy cream"),
    ("whipping cream", "heavy cream"),
    ("canola oil", "vegetable oil"),
    ("neutral oil", "vegetable oil"),
    ("yeast", "instant yeast"),
    ("dry yeast", "active dry yeast"),
    ("bicarbonate of soda", "baking soda"),
    ("cocoa", "cocoa powder"),
    ("vanilla", "vanilla extract"),
    ("table salt", "salt"),
    ("fine salt", "salt"),
];

/// Ingredient counted by the piece -> grams per item
pub const COUNT_WEIGHT_TABLE: &[(&str, f64)] = &[
    ("egg yolk", 18.0),
    ("egg white", 30.0),
    ("egg", 50.0),
    ("banana", 118.0),
    ("apple", 182.0),
    ("lemon", 58.0),
    ("lime", 44.0),
    ("orange", 131.0),
    ("sweet potato", 130.0),
    ("potato", 213.0),
    ("onion", 110.0),
    ("carrot", 61.0),
    ("garlic clove", 5.0),
    ("vanilla bean", 3.0),
];

static DENSITY_INDEX: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| DENSITY_TABLE.iter().copied().collect());

static ALIAS_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIAS_TABLE.iter().copied().collect());

static COUNT_WEIGHT_INDEX: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| COUNT_WEIGHT_TABLE.iter().copied().collect());

/// First table entry whose key contains `name` or is contained in it
fn first_substring_match<V: Copy>(
    name: &str,
    table: &[(&'static str, V)],
) -> Option<(&'static str, V)> {
    table
        .iter()
        .find(|(key, _)| name.contains(key) || key.contains(name))
        .copied()
}

/// Resolve a free-form ingredient name to a canonical `DENSITY_TABLE` key.
///
/// Tries, in order: exact canonical name, exact alias, substring match
/// against canonical names, substring match against aliases.
///
/// # Examples
///
/// ```rust
/// use bakehouse::density_table::resolve_density_key;
///
/// assert_eq!(resolve_density_key("AP flour"), Some("all-purpose flour"));
/// assert_eq!(
///     resolve_density_key("organic all-purpose flour"),
///     Some("all-purpose flour")
/// );
/// assert_eq!(resolve_density_key("unicorn tears"), None);
/// ```
pub fn resolve_density_key(name: &str) -> Option<&'static str> {
    let normalized = normalize_name(name);
    // An empty name is a substring of every key
    if normalized.is_empty() {
        return None;
    }

    if let Some((key, _)) = DENSITY_INDEX.get_key_value(normalized.as_str()) {
        return Some(*key);
    }

    if let Some(canonical) = ALIAS_INDEX.get(normalized.as_str()) {
        return Some(*canonical);
    }

    if let Some((key, _)) = first_substring_match(&normalized, DENSITY_TABLE) {
        trace!(ingredient = %normalized, matched = key, "Density resolved by substring");
        return Some(key);
    }

    if let Some((alias, canonical)) = first_substring_match(&normalized, ALIAS_TABLE) {
        trace!(ingredient = %normalized, alias = alias, matched = canonical, "Density resolved by alias substring");
        return Some(canonical);
    }

    None
}

/// Density in g/mL for an ingredient name, if one can be resolved
pub fn lookup_density(name: &str) -> Option<f64> {
    resolve_density_key(name).and_then(|key| DENSITY_INDEX.get(key).copied())
}

/// Grams per single item for a counted ingredient ("3 eggs").
///
/// Exact normalized name first, then the same bidirectional substring
/// fallback as density lookup.
pub fn lookup_count_weight(name: &str) -> Option<f64> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return None;
    }

    if let Some(grams) = COUNT_WEIGHT_INDEX.get(normalized.as_str()) {
        return Some(*grams);
    }

    first_substring_match(&normalized, COUNT_WEIGHT_TABLE).map(|(_, grams)| grams)
}
