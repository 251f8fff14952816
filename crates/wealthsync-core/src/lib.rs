//! WealthSync Core Library
//!
//! Shared functionality for the WealthSync budgeting calculator:
//! - Regional reference data (inflation, cost of living, city tiers)
//! - Budget calculator with needs-hierarchy recommendations
//! - Budget history store abstraction with an in-memory implementation
//! - Request coercion and validation

pub mod calculator;
pub mod error;
pub mod history;
pub mod models;
pub mod reference;

pub use calculator::{BudgetCalculator, ResolvedLocation};
pub use error::{Error, Result};
pub use history::{HistoryStore, InMemoryHistory};
pub use models::{
    BudgetHistoryEntry, BudgetRequest, BudgetResult, BudgetSubmission, CityListing,
    ExpenseCategories, NewBudgetEntry,
};
pub use reference::{
    CityClassification, CityTier, NeedCategory, NeedThresholds, ReferenceData, RegionalProfile,
};
