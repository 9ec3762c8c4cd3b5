//! # Bakehouse
//!
//! Domain engine for a small bakery's record keeping: parses free-form
//! recipe lines into weighed ingredients, scales them, folds production
//! batches into packaging and shopping totals, and lays production
//! timelines out against a bake time.

pub mod config;
pub mod density_table;
pub mod errors;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod measurement_patterns;
pub mod packaging;
pub mod scaling;
pub mod shopping;
pub mod text_processing;
pub mod timeline;
pub mod unit_converter;

pub use ingredient_model::{ParsedIngredient, ScaledIngredient, Weighable};
pub use ingredient_parser::{parse_ingredient, parse_ingredient_list};
pub use packaging::{calculate_packaging_needs, PackagingNeed};
pub use scaling::{calculate_pan_volume, calculate_scaling_factor, scale_ingredients, smart_round};
pub use shopping::{aggregate_shopping_list, ShoppingItem};
pub use timeline::{generate_timeline, generate_timeline_from_template, TemplateRegistry, TimelineStep};
pub use unit_converter::{convert_to_grams, count_weight_grams};
