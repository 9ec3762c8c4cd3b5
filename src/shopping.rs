//! # Shopping List Aggregator
//!
//! Combines the ingredients of several scaled production batches into one
//! shopping list, one line per ingredient, remembering which batch asked
//! for how much.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SHOPPING_DECIMAL_PLACES;
use crate::ingredient_model::ParsedIngredient;
use crate::scaling::format_weight;
use crate::text_processing::{compare_names, normalize_name};

/// An ingredient as stored on a batch's recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingIngredient {
    /// Stable ingredient id; grouping falls back to the name when absent
    #[serde(default)]
    pub ingredient_id: Option<String>,
    pub name: String,
    /// Weight at the recipe's base yield
    #[serde(default)]
    pub unit_grams: Option<f64>,
}

impl From<&ParsedIngredient> for ShoppingIngredient {
    fn from(parsed: &ParsedIngredient) -> Self {
        Self {
            ingredient_id: None,
            name: parsed.ingredient_name.clone(),
            unit_grams: parsed.unit_grams,
        }
    }
}

/// One production batch of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingBatch {
    pub batch_name: String,
    pub scaling_factor: f64,
    #[serde(default)]
    pub ingredients: Vec<ShoppingIngredient>,
}

/// What one batch contributes to a shopping item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchContribution {
    pub batch_name: String,
    pub grams: f64,
}

/// One line of the consolidated shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub ingredient_id: Option<String>,
    pub name: String,
    /// Sum over batches, rounded to two decimals
    pub total_grams: f64,
    pub display_quantity: String,
    /// Contributions in the order the batches were given
    pub batches: Vec<BatchContribution>,
    /// Some contributing ingredient had no gram weight and counted as 0 g
    pub has_unknown_weight: bool,
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.display_quantity)?;
        if self.has_unknown_weight {
            write!(f, " (+ unweighed)")?;
        }
        Ok(())
    }
}

fn grouping_key(ingredient: &ShoppingIngredient) -> String {
    match &ingredient.ingredient_id {
        Some(id) => format!("id:{id}"),
        None => format!("name:{}", normalize_name(&ingredient.name)),
    }
}

fn round_to_places(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Consolidated shopping list, sorted by name.
///
/// Ingredients group by id when they have one, otherwise by normalized
/// name. The total is rounded once, after summing.
pub fn aggregate_shopping_list(batches: &[ShoppingBatch]) -> Vec<ShoppingItem> {
    let mut items: Vec<ShoppingItem> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for batch in batches {
        for ingredient in &batch.ingredients {
            let index = *positions.entry(grouping_key(ingredient)).or_insert_with(|| {
                items.push(ShoppingItem {
                    ingredient_id: ingredient.ingredient_id.clone(),
                    name: ingredient.name.trim().to_string(),
                    total_grams: 0.0,
                    display_quantity: String::new(),
                    batches: Vec::new(),
                    has_unknown_weight: false,
                });
                items.len() - 1
            });

            let grams = ingredient.unit_grams.unwrap_or(0.0) * batch.scaling_factor;
            let item = &mut items[index];
            item.total_grams += grams;
            item.has_unknown_weight |= ingredient.unit_grams.is_none();
            item.batches.push(BatchContribution {
                batch_name: batch.batch_name.clone(),
                grams,
            });

            debug!(batch = %batch.batch_name, ingredient = %ingredient.name, grams, "Added shopping contribution");
        }
    }

    for item in &mut items {
        item.total_grams = round_to_places(item.total_grams, SHOPPING_DECIMAL_PLACES);
        item.display_quantity = format_weight(item.total_grams);
    }
    items.sort_by(|a, b| compare_names(&a.name, &b.name));

    info!(
        batches = batches.len(),
        items = items.len(),
        "Aggregated shopping list"
    );

    items
}
