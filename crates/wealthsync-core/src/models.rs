//! Domain models for WealthSync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::reference::NeedCategory;

/// Spend per need category; categories not supplied are zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategories {
    pub physiological: f64,
    pub safety: f64,
    pub social: f64,
    pub esteem: f64,
    pub self_actualization: f64,
}

impl ExpenseCategories {
    pub fn set(&mut self, category: NeedCategory, amount: f64) {
        match category {
            NeedCategory::Physiological => self.physiological = amount,
            NeedCategory::Safety => self.safety = amount,
            NeedCategory::Social => self.social = amount,
            NeedCategory::Esteem => self.esteem = amount,
            NeedCategory::SelfActualization => self.self_actualization = amount,
        }
    }
}

/// A validated budget calculation request
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRequest {
    pub email: String,
    pub income: f64,
    pub expenses: f64,
    pub savings_goal: f64,
    /// Lowercased location as submitted
    pub location: String,
    pub expense_categories: ExpenseCategories,
}

impl BudgetRequest {
    pub fn new(email: &str, income: f64, expenses: f64, savings_goal: f64, location: &str) -> Self {
        Self {
            email: email.to_string(),
            income,
            expenses,
            savings_goal,
            location: location.trim().to_lowercase(),
            expense_categories: ExpenseCategories::default(),
        }
    }

    pub fn with_category(mut self, category: NeedCategory, amount: f64) -> Self {
        self.expense_categories.set(category, amount);
        self
    }

    /// Reject amounts that are NaN or infinite
    ///
    /// Requests built from a [`BudgetSubmission`] already pass this; requests
    /// built directly from numbers (the CLI, library callers) may not.
    pub fn check_amounts(&self) -> Result<()> {
        ensure_finite("income", self.income)?;
        ensure_finite("expenses", self.expenses)?;
        ensure_finite("savings_goal", self.savings_goal)?;

        let categories = &self.expense_categories;
        for category in NeedCategory::all() {
            let amount = match category {
                NeedCategory::Physiological => categories.physiological,
                NeedCategory::Safety => categories.safety,
                NeedCategory::Social => categories.social,
                NeedCategory::Esteem => categories.esteem,
                NeedCategory::SelfActualization => categories.self_actualization,
            };
            ensure_finite(&format!("expense_categories.{}", category.as_str()), amount)?;
        }
        Ok(())
    }
}

/// Budget request body as submitted over the wire
///
/// Numeric fields stay loosely typed until [`BudgetSubmission::validate`]
/// coerces them, so both `50000` and `"50000"` are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetSubmission {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub income: Option<Value>,
    #[serde(default)]
    pub expenses: Option<Value>,
    #[serde(default)]
    pub savings_goal: Option<Value>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub expense_categories: Option<serde_json::Map<String, Value>>,
}

impl BudgetSubmission {
    /// Coerce the submission into a [`BudgetRequest`]
    pub fn validate(self) -> Result<BudgetRequest> {
        let income = coerce_amount("income", self.income.as_ref())?;
        let expenses = coerce_amount("expenses", self.expenses.as_ref())?;
        let savings_goal = coerce_amount("savings_goal", self.savings_goal.as_ref())?;

        let mut expense_categories = ExpenseCategories::default();
        if let Some(categories) = self.expense_categories {
            for category in NeedCategory::all() {
                let value = categories.get(category.as_str()).filter(|v| !v.is_null());
                if let Some(value) = value {
                    let field = format!("expense_categories.{}", category.as_str());
                    expense_categories.set(*category, coerce_amount(&field, Some(value))?);
                }
            }
        }

        let mut request = BudgetRequest::new(
            self.email.as_deref().unwrap_or_default(),
            income,
            expenses,
            savings_goal,
            self.location.as_deref().unwrap_or_default(),
        );
        request.expense_categories = expense_categories;
        Ok(request)
    }
}

/// Coerce a JSON value holding a number or numeric string into an amount
pub fn coerce_amount(field: &str, value: Option<&Value>) -> Result<f64> {
    let amount = match value {
        None | Some(Value::Null) => {
            return Err(Error::validation(field, "a numeric value is required"))
        }
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::validation(field, "number is out of range"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::validation(field, format!("'{}' is not a number", s)))?,
        Some(other) => {
            return Err(Error::validation(
                field,
                format!("expected a number, got {}", json_type_name(other)),
            ))
        }
    };

    ensure_finite(field, amount)
}

/// Pass through a finite amount, or fail validation for `field`
pub fn ensure_finite(field: &str, amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::validation(field, "must be a finite number"))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Computed budget metrics and recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    pub savings: f64,
    pub adjusted_savings: f64,
    pub recommended_savings: f64,
    /// Tier-adjusted inflation in percent
    pub inflation: f64,
    /// Tier-adjusted cost-of-living index
    pub cost_of_living_index: f64,
    pub message: String,
    pub recommendations: Vec<String>,
    pub expense_categories: ExpenseCategories,
}

/// A stored budget calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetHistoryEntry {
    pub id: i64,
    pub email: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub savings_goal: f64,
    pub recommended_savings: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A budget calculation about to be stored; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetEntry {
    pub email: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub savings_goal: f64,
    pub recommended_savings: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NewBudgetEntry {
    pub fn from_result(request: &BudgetRequest, result: &BudgetResult) -> Self {
        Self {
            email: request.email.clone(),
            income: request.income,
            expenses: request.expenses,
            savings: result.savings,
            savings_goal: request.savings_goal,
            recommended_savings: result.recommended_savings,
            message: result.message.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn into_entry(self, id: i64) -> BudgetHistoryEntry {
        BudgetHistoryEntry {
            id,
            email: self.email,
            income: self.income,
            expenses: self.expenses,
            savings: self.savings,
            savings_goal: self.savings_goal,
            recommended_savings: self.recommended_savings,
            message: self.message,
            timestamp: self.timestamp,
        }
    }
}

/// City entry for the city picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityListing {
    pub name: String,
    pub state: String,
}

/// Capitalize the first letter of each word, lowercasing the rest
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
