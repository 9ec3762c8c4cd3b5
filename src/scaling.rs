//! # Scaling Engine
//!
//! Computes a scaling factor (by multiplier, by yield, or by pan volume),
//! rescales an ingredient list, rounds each weight to a precision that suits
//! a kitchen scale and computes baker's percentages.
//!
//! ## Usage
//!
//! ```rust
//! use bakehouse::ingredient_parser::parse_ingredient_list;
//! use bakehouse::scaling::{calculate_scaling_factor, scale_ingredients, ScalingInput};
//!
//! let recipe = parse_ingredient_list("1000 g bread flour\n720 g water\n22 g salt");
//! let factor = calculate_scaling_factor(&ScalingInput::Quantity {
//!     target_quantity: Some(3.0),
//!     recipe_yield_quantity: Some(2.0),
//! });
//! let sheet = scale_ingredients(&recipe, factor);
//!
//! assert_eq!(sheet[0].display_weight, "1.5 kg");
//! assert_eq!(sheet[2].scaled_grams, 33.0);
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DISPLAY_DECIMAL_PLACES, KG_DISPLAY_THRESHOLD_GRAMS};
use crate::errors::ParsePanShapeError;
use crate::ingredient_model::{ScaledIngredient, Weighable};
use crate::text_processing::format_decimal;

/// How the scaling factor is derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ScalingInput {
    /// Explicit multiplier, 1 when absent
    Multiplier {
        #[serde(default)]
        multiplier: Option<f64>,
    },
    /// Desired yield over the recipe's yield
    #[serde(rename_all = "camelCase")]
    Quantity {
        #[serde(default)]
        target_quantity: Option<f64>,
        #[serde(default)]
        recipe_yield_quantity: Option<f64>,
    },
    /// Target pan volume over the recipe's pan volume
    #[serde(rename_all = "camelCase")]
    Pan {
        #[serde(default)]
        target_pan_volume_ml: Option<f64>,
        #[serde(default)]
        original_pan_volume_ml: Option<f64>,
    },
}

impl ScalingInput {
    /// Pan-mode input from the dimensions of the recipe's pan and the target pan.
    ///
    /// A pan whose volume cannot be computed is treated as missing, so the
    /// resulting factor falls back to 1.
    pub fn from_pans(
        original_shape: PanShape,
        original: &PanDimensions,
        target_shape: PanShape,
        target: &PanDimensions,
    ) -> Self {
        let available = |volume: f64| (volume > 0.0).then_some(volume);
        ScalingInput::Pan {
            target_pan_volume_ml: available(target_shape.volume_ml(target)),
            original_pan_volume_ml: available(original_shape.volume_ml(original)),
        }
    }
}

/// `numerator / denominator`, or 1 when either is missing or not positive
fn guarded_ratio(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if n > 0.0 && d > 0.0 => n / d,
        _ => 1.0,
    }
}

/// Scaling factor for the given mode
pub fn calculate_scaling_factor(input: &ScalingInput) -> f64 {
    let factor = match input {
        ScalingInput::Multiplier { multiplier } => multiplier.unwrap_or(1.0),
        ScalingInput::Quantity {
            target_quantity,
            recipe_yield_quantity,
        } => guarded_ratio(*target_quantity, *recipe_yield_quantity),
        ScalingInput::Pan {
            target_pan_volume_ml,
            original_pan_volume_ml,
        } => guarded_ratio(*target_pan_volume_ml, *original_pan_volume_ml),
    };

    debug!(?input, factor, "Calculated scaling factor");
    factor
}

/// Round a weight to a precision that depends on its size.
///
/// - 100 g and above: whole grams
/// - 10 g up to 100 g: nearest half gram
/// - below 10 g: nearest tenth of a gram
///
/// # Examples
///
/// ```rust
/// use bakehouse::scaling::smart_round;
///
/// assert_eq!(smart_round(1234.7), 1235.0);
/// assert_eq!(smart_round(47.3), 47.5);
/// assert_eq!(smart_round(3.27), 3.3);
/// ```
pub fn smart_round(grams: f64) -> f64 {
    if grams >= 100.0 {
        grams.round()
    } else if grams >= 10.0 {
        (grams * 2.0).round() / 2.0
    } else {
        (grams * 10.0).round() / 10.0
    }
}

/// Human-readable weight: kilograms from 1000 g, grams below
///
/// # Examples
///
/// ```rust
/// use bakehouse::scaling::format_weight;
///
/// assert_eq!(format_weight(1500.0), "1.5 kg");
/// assert_eq!(format_weight(47.5), "47.5 g");
/// assert_eq!(format_weight(281.0), "281 g");
/// ```
pub fn format_weight(grams: f64) -> String {
    if grams >= KG_DISPLAY_THRESHOLD_GRAMS {
        format!(
            "{} kg",
            format_decimal(grams / 1000.0, DISPLAY_DECIMAL_PLACES)
        )
    } else {
        format!("{} g", format_decimal(grams, DISPLAY_DECIMAL_PLACES))
    }
}

/// Rescale every ingredient by `factor`, preserving input order.
///
/// Baker's percentages use the unrounded scaled weights. They are `None`
/// when the ingredient's weight is unknown or the recipe has no flour weight.
pub fn scale_ingredients<I: Weighable>(ingredients: &[I], factor: f64) -> Vec<ScaledIngredient> {
    let total_flour_grams: f64 = ingredients
        .iter()
        .filter(|ingredient| ingredient.is_flour())
        .map(|ingredient| ingredient.unit_grams().unwrap_or(0.0) * factor)
        .sum();

    debug!(
        ingredients = ingredients.len(),
        factor,
        total_flour_grams,
        "Scaling ingredients"
    );

    ingredients
        .iter()
        .map(|ingredient| {
            let original_grams = ingredient.unit_grams().unwrap_or(0.0);
            let raw_scaled = original_grams * factor;
            let scaled_grams = smart_round(raw_scaled);
            let bakers_percentage = match ingredient.unit_grams() {
                Some(_) if total_flour_grams > 0.0 => Some(raw_scaled / total_flour_grams),
                _ => None,
            };

            ScaledIngredient {
                ingredient_name: ingredient.ingredient_name().to_string(),
                is_flour: ingredient.is_flour(),
                original_grams,
                scaled_grams,
                display_weight: format_weight(scaled_grams),
                bakers_percentage,
            }
        })
        .collect()
}

/// Sum of the rounded scaled weights
pub fn total_scaled_grams(ingredients: &[ScaledIngredient]) -> f64 {
    ingredients.iter().map(|i| i.scaled_grams).sum()
}

/// Supported baking pan shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanShape {
    Rectangular,
    Square,
    Round,
}

impl FromStr for PanShape {
    type Err = ParsePanShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectangular" => Ok(PanShape::Rectangular),
            "square" => Ok(PanShape::Square),
            "round" => Ok(PanShape::Round),
            _ => Err(ParsePanShapeError(s.to_string())),
        }
    }
}

impl fmt::Display for PanShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanShape::Rectangular => "rectangular",
            PanShape::Square => "square",
            PanShape::Round => "round",
        };
        write!(f, "{name}")
    }
}

/// Interior pan dimensions in centimetres
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanDimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
}

impl PanShape {
    /// Interior volume in millilitres, 0 when a required dimension is missing
    pub fn volume_ml(&self, dimensions: &PanDimensions) -> f64 {
        let volume = match self {
            PanShape::Rectangular => dimensions
                .length
                .zip(dimensions.width)
                .zip(dimensions.height)
                .map(|((length, width), height)| length * width * height),
            PanShape::Square => dimensions
                .length
                .zip(dimensions.height)
                .map(|(length, height)| length * length * height),
            PanShape::Round => dimensions
                .diameter
                .zip(dimensions.height)
                .map(|(diameter, height)| PI * (diameter / 2.0).powi(2) * height),
        };

        volume.unwrap_or(0.0)
    }
}

/// Pan volume in millilitres for a shape given by name.
///
/// Returns 0 for an unknown shape or missing dimensions; callers must treat 0
/// as "unavailable".
pub fn calculate_pan_volume(shape: &str, dimensions: &PanDimensions) -> f64 {
    match shape.parse::<PanShape>() {
        Ok(shape) => shape.volume_ml(dimensions),
        Err(err) => {
            warn!(%err, "Cannot compute pan volume");
            0.0
        }
    }
}
