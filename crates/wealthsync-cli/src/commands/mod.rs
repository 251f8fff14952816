//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budget` - One-off calculations and the city listing
//! - `serve` - Web server command

pub mod budget;
pub mod serve;

// Re-export command functions for main.rs
pub use budget::*;
pub use serve::*;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use wealthsync_core::{BudgetCalculator, ReferenceData};

/// Load reference data and build a calculator around it
pub fn open_calculator(reference_path: Option<&Path>) -> Result<BudgetCalculator> {
    let reference = ReferenceData::load(reference_path).context("Failed to load reference data")?;
    Ok(BudgetCalculator::new(Arc::new(reference)))
}
