//! # Ingredient Data Model
//!
//! Records produced by the parser and the scaling engine.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredient**: one raw recipe line split into quantity, unit,
//!   name and preparation notes, with a gram weight when one can be derived
//! - **ScaledIngredient**: an ingredient's weight after scaling, with smart
//!   rounding and its baker's percentage
//! - **Weighable**: anything that has a name, an optional gram weight and a
//!   flour flag can be scaled
//!
//! ## Usage
//!
//! ```rust
//! use bakehouse::ingredient_parser::parse_ingredient;
//! use bakehouse::scaling::scale_ingredients;
//!
//! let flour = parse_ingredient("500 g bread flour");
//! let water = parse_ingredient("350 g water");
//! let scaled = scale_ingredients(&[flour, water], 2.0);
//!
//! assert_eq!(scaled[0].scaled_grams, 1000.0);
//! assert_eq!(scaled[1].bakers_percentage, Some(0.7));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// True when a name mentions flour, ignoring case
pub fn is_flour_name(name: &str) -> bool {
    name.to_lowercase().contains("flour")
}

/// An ingredient that can be weighed and scaled
pub trait Weighable {
    /// Display name of the ingredient
    fn ingredient_name(&self) -> &str;

    /// Weight in grams at the recipe's base yield, if known
    fn unit_grams(&self) -> Option<f64>;

    /// Whether the ingredient counts toward total flour weight
    fn is_flour(&self) -> bool {
        is_flour_name(self.ingredient_name())
    }
}

/// Result of parsing one raw ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIngredient {
    /// The line exactly as supplied
    pub raw_text: String,

    /// Numeric amount; `None` when absent or vague ("to taste")
    pub quantity: Option<f64>,

    /// Unit token as written, lower-cased except a bare `"T"`
    pub unit: Option<String>,

    /// Lower-cased, whitespace-collapsed name
    pub ingredient_name: String,

    /// Everything after the first comma
    pub prep_notes: Option<String>,

    /// Weight in grams, when quantity and a conversion are both available
    pub unit_grams: Option<f64>,

    /// True iff the name contains "flour"
    pub is_flour: bool,
}

impl ParsedIngredient {
    /// Check if this ingredient has a numeric quantity
    pub fn has_quantity(&self) -> bool {
        self.quantity.is_some()
    }

    /// Check if a gram weight could be derived
    pub fn has_weight(&self) -> bool {
        self.unit_grams.is_some()
    }
}

impl Weighable for ParsedIngredient {
    fn ingredient_name(&self) -> &str {
        &self.ingredient_name
    }

    fn unit_grams(&self) -> Option<f64> {
        self.unit_grams
    }

    fn is_flour(&self) -> bool {
        self.is_flour
    }
}

/// Writes `"{quantity} {unit} {name}"`, leaving out the parts that are absent.
/// Parsing the output again yields the same quantity, unit and name.
impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quantity) = self.quantity {
            write!(f, "{} ", quantity)?;
        }

        if let Some(unit) = &self.unit {
            write!(f, "{} ", unit)?;
        }

        write!(f, "{}", self.ingredient_name)
    }
}

/// An ingredient's weight after scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledIngredient {
    pub ingredient_name: String,
    pub is_flour: bool,

    /// Weight before scaling; 0 when unknown
    pub original_grams: f64,

    /// Weight after scaling and smart rounding
    pub scaled_grams: f64,

    /// Formatted scaled weight ("1.25 kg", "47.5 g")
    pub display_weight: String,

    /// Unrounded scaled weight over total scaled flour weight (1.0 = 100%)
    pub bakers_percentage: Option<f64>,
}

impl fmt::Display for ScaledIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.ingredient_name, self.display_weight)?;

        if let Some(percentage) = self.bakers_percentage {
            write!(f, " ({:.1}%)", percentage * 100.0)?;
        }

        Ok(())
    }
}
