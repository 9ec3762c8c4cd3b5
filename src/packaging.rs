//! # Packaging Needs
//!
//! Folds the packaging requirements of several production batches into one
//! total per packaging type and compares it against stock.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::text_processing::compare_names;

/// Packaging used per unit of a batch's yield, with a stock snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingEntry {
    pub packaging_type_id: String,
    pub name: String,
    /// Packaging units per yielded item (0.25 = one box per four loaves)
    pub quantity_per_yield: f64,
    pub current_stock: i64,
    pub reorder_threshold: i64,
}

/// One production batch and the packaging it uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingBatch {
    #[serde(default)]
    pub batch_name: String,
    /// Number of items the batch produces
    pub target_quantity: f64,
    #[serde(default)]
    pub packaging: Vec<PackagingEntry>,
}

/// Total requirement for one packaging type across batches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingNeed {
    pub packaging_type_id: String,
    pub name: String,
    pub quantity_needed: i64,
    pub current_stock: i64,
    pub reorder_threshold: i64,
    /// How many units must be bought to cover this run
    pub shortfall: i64,
    /// Stock left after this run would fall below the reorder threshold
    pub is_low_stock: bool,
}

impl PackagingNeed {
    fn new(entry: &PackagingEntry) -> Self {
        Self {
            packaging_type_id: entry.packaging_type_id.clone(),
            name: entry.name.clone(),
            quantity_needed: 0,
            current_stock: entry.current_stock,
            reorder_threshold: entry.reorder_threshold,
            shortfall: 0,
            is_low_stock: false,
        }
    }

    fn finish(mut self) -> Self {
        self.shortfall = self.quantity_needed.saturating_sub(self.current_stock).max(0);
        self.is_low_stock =
            self.current_stock.saturating_sub(self.quantity_needed) < self.reorder_threshold;
        self
    }
}

impl fmt::Display for PackagingNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: need {}, have {}",
            self.name, self.quantity_needed, self.current_stock
        )?;

        if self.shortfall > 0 {
            write!(f, ", short {}", self.shortfall)?;
        }
        if self.is_low_stock {
            write!(f, " (low stock)")?;
        }

        Ok(())
    }
}

/// Units of packaging one batch needs for one entry, rounded up and
/// clamped to the `i64` range
fn units_for_batch(batch: &PackagingBatch, entry: &PackagingEntry) -> i64 {
    (batch.target_quantity * entry.quantity_per_yield).ceil() as i64
}

/// Total packaging needs per type, sorted by name.
///
/// Each batch's requirement is rounded up on its own before summing. Stock
/// and threshold take the last value seen for a type.
pub fn calculate_packaging_needs(batches: &[PackagingBatch]) -> Vec<PackagingNeed> {
    let mut needs: Vec<PackagingNeed> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for batch in batches {
        for entry in &batch.packaging {
            let index = *positions
                .entry(entry.packaging_type_id.clone())
                .or_insert_with(|| {
                    needs.push(PackagingNeed::new(entry));
                    needs.len() - 1
                });

            let need = &mut needs[index];
            let units = units_for_batch(batch, entry);
            need.quantity_needed = need.quantity_needed.saturating_add(units);
            need.current_stock = entry.current_stock;
            need.reorder_threshold = entry.reorder_threshold;

            debug!(
                batch = %batch.batch_name,
                packaging = %entry.packaging_type_id,
                units,
                "Added packaging for batch"
            );
        }
    }

    let mut needs: Vec<PackagingNeed> = needs.into_iter().map(PackagingNeed::finish).collect();
    needs.sort_by(|a, b| compare_names(&a.name, &b.name));

    info!(
        batches = batches.len(),
        packaging_types = needs.len(),
        low_stock = needs.iter().filter(|n| n.is_low_stock).count(),
        "Calculated packaging needs"
    );

    needs
}
