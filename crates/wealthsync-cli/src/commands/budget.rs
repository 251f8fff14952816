//! Budget command implementations

use std::path::Path;

use anyhow::{Context, Result};
use wealthsync_core::{BudgetRequest, BudgetResult, ExpenseCategories};

use super::open_calculator;

/// Print known cities as JSON
pub fn cmd_cities(reference_path: Option<&Path>) -> Result<()> {
    let calculator = open_calculator(reference_path)?;
    let cities = calculator.list_cities();
    println!("{}", serde_json::to_string_pretty(&cities)?);
    Ok(())
}

/// Run one calculation and print the result as JSON
///
/// Nothing is recorded; history only exists inside a running server.
pub fn cmd_calc(
    reference_path: Option<&Path>,
    income: f64,
    expenses: f64,
    savings_goal: f64,
    location: &str,
    categories: ExpenseCategories,
) -> Result<()> {
    let result = calculate(
        reference_path,
        income,
        expenses,
        savings_goal,
        location,
        categories,
    )?;
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to format result")?
    );
    Ok(())
}

/// Validate the amounts and compute a budget without recording it
pub fn calculate(
    reference_path: Option<&Path>,
    income: f64,
    expenses: f64,
    savings_goal: f64,
    location: &str,
    categories: ExpenseCategories,
) -> Result<BudgetResult> {
    let calculator = open_calculator(reference_path)?;

    let mut request = BudgetRequest::new("", income, expenses, savings_goal, location);
    request.expense_categories = categories;

    calculator
        .calculate(&request)
        .context("Invalid budget amounts")
}
