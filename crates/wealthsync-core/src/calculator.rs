//! Budget calculator
//!
//! Turns a [`BudgetRequest`] into savings figures adjusted for the user's
//! location, plus recommendations from the needs hierarchy:
//!
//! 1. Resolve the location to a region and city tier
//! 2. Adjust the region's inflation and cost-of-living index by tier
//! 3. Compute raw, recommended and cost-of-living adjusted savings
//! 4. Evaluate need categories lowest first; a level is only assessed once
//!    every level below it is funded
//! 5. Add general spending and location notes

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::models::{
    title_case, BudgetRequest, BudgetResult, CityListing, ExpenseCategories, NewBudgetEntry,
};
use crate::reference::{
    CityTier, NeedCategory, NeedThresholds, ReferenceData, RegionalProfile,
    BASELINE_COST_OF_LIVING_INDEX, DEFAULT_REGION,
};

/// Expenses above this share of income trigger a warning
pub const HIGH_EXPENSE_RATIO: f64 = 0.70;

/// Adjusted index above which a location counts as expensive
pub const EXPENSIVE_LOCATION_INDEX: f64 = 60.0;

/// Adjusted index below which a location counts as affordable
pub const AFFORDABLE_LOCATION_INDEX: f64 = 45.0;

pub const GOAL_MET_MESSAGE: &str = "Great job! You're meeting your savings goal.";
pub const GOAL_MISSED_MESSAGE: &str =
    "You need to save more to meet your goal. Consider reducing expenses.";
pub const HIGH_EXPENSES_RECOMMENDATION: &str =
    "Your expenses are high. Try cutting down on non-essential spending.";
pub const OVERSPENDING_RECOMMENDATION: &str =
    "You're spending more than you earn. Create a stricter budget.";
pub const INVESTMENT_RECOMMENDATION: &str =
    "Consider investing in low-risk options like fixed deposits.";

/// Where a location string landed in the reference tables
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Region key whose profile was used
    pub region: String,
    pub tier: CityTier,
    /// Region profile after the tier adjustment
    pub profile: RegionalProfile,
}

/// Stateless budget calculator over shared reference data
#[derive(Debug, Clone)]
pub struct BudgetCalculator {
    reference: Arc<ReferenceData>,
}

impl BudgetCalculator {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Resolve a location to its region, tier and adjusted profile
    ///
    /// Known cities use their state and tier. Anything else is tried as a
    /// region key, then falls back to `default`, always at tier 3.
    pub fn resolve_location(&self, location: &str) -> ResolvedLocation {
        let location = location.trim().to_lowercase();

        let (region, tier) = match self.reference.city(&location) {
            Some(city) => (city.state.clone(), city.tier),
            None if self.reference.has_region(&location) => (location, CityTier::Tier3),
            None => (DEFAULT_REGION.to_string(), CityTier::Tier3),
        };

        let profile = tier.adjust(self.reference.region_profile(&region));
        ResolvedLocation {
            region,
            tier,
            profile,
        }
    }

    /// Compute budget metrics and recommendations
    pub fn compute(&self, request: &BudgetRequest) -> BudgetResult {
        let resolved = self.resolve_location(&request.location);
        debug!(
            location = %request.location,
            region = %resolved.region,
            tier = resolved.tier.as_u8(),
            inflation = resolved.profile.inflation,
            cost_of_living_index = resolved.profile.cost_of_living_index,
            "Resolved budget location"
        );

        let RegionalProfile {
            inflation,
            cost_of_living_index,
        } = resolved.profile;

        let savings = request.income - request.expenses;
        let recommended_savings = request.savings_goal * (1.0 + inflation / 100.0);

        let expense_ratio = cost_of_living_index / BASELINE_COST_OF_LIVING_INDEX;
        let adjusted_expenses = request.expenses * expense_ratio;
        let adjusted_savings = request.income - adjusted_expenses;

        // Raw savings against the raw goal, not the adjusted figures
        let message = if savings >= request.savings_goal {
            GOAL_MET_MESSAGE
        } else {
            GOAL_MISSED_MESSAGE
        };

        let mut recommendations = needs_recommendations(
            self.reference.needs(),
            request.income,
            &request.expense_categories,
        );

        if request.expenses > HIGH_EXPENSE_RATIO * request.income {
            recommendations.push(HIGH_EXPENSES_RECOMMENDATION.to_string());
        }
        if savings < 0.0 {
            recommendations.push(OVERSPENDING_RECOMMENDATION.to_string());
        }
        if cost_of_living_index > EXPENSIVE_LOCATION_INDEX {
            recommendations.push(format!(
                "Living in {} is expensive. Consider relocating or finding cheaper alternatives for housing and daily expenses.",
                title_case(&request.location)
            ));
        } else if cost_of_living_index < AFFORDABLE_LOCATION_INDEX {
            recommendations.push(format!(
                "Living in {} is relatively affordable. You can allocate more towards savings or investments.",
                title_case(&request.location)
            ));
        }
        recommendations.push(INVESTMENT_RECOMMENDATION.to_string());

        BudgetResult {
            savings,
            adjusted_savings,
            recommended_savings,
            inflation,
            cost_of_living_index,
            message: message.to_string(),
            recommendations,
            expense_categories: request.expense_categories,
        }
    }

    /// Compute a budget, rejecting inputs or results that are not finite
    ///
    /// Finite inputs near `f64::MAX` can still overflow, so the computed
    /// metrics are checked as well as the request.
    pub fn calculate(&self, request: &BudgetRequest) -> Result<BudgetResult> {
        request.check_amounts()?;
        let result = self.compute(request);

        let overflowed = if !result.savings.is_finite() || !result.adjusted_savings.is_finite() {
            Some("income")
        } else if !result.recommended_savings.is_finite() {
            Some("savings_goal")
        } else {
            None
        };
        if let Some(field) = overflowed {
            return Err(Error::validation(field, "result out of range"));
        }

        Ok(result)
    }

    /// Compute a budget and append it to the history store
    ///
    /// Nothing is stored if validation fails or the store rejects the entry.
    pub fn calculate_and_record(
        &self,
        request: &BudgetRequest,
        history: &dyn HistoryStore,
    ) -> Result<BudgetResult> {
        let result = self.calculate(request)?;
        let entry = history.append(NewBudgetEntry::from_result(request, &result))?;

        info!(
            id = entry.id,
            savings = result.savings,
            recommendations = result.recommendations.len(),
            "Recorded budget calculation"
        );

        Ok(result)
    }

    /// Known cities for display, in table order
    pub fn list_cities(&self) -> Vec<CityListing> {
        self.reference
            .cities()
            .map(|(name, city)| CityListing {
                name: title_case(name),
                state: title_case(&city.state),
            })
            .collect()
    }
}

/// Walk the needs hierarchy lowest level first
///
/// Each level records whether it is funded; higher levels are only assessed
/// when every level beneath them is.
fn needs_recommendations(
    needs: &NeedThresholds,
    income: f64,
    spend: &ExpenseCategories,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let min_physiological = needs.minimum(NeedCategory::Physiological, income);
    let physiological_met = spend.physiological >= min_physiological;
    if !physiological_met {
        recommendations.push(format!(
            "Your physiological expenses (₹{}) are below the recommended minimum (₹{:.2}). Reallocate funds from higher-level needs (e.g., social, self-actualization) to cover basic needs like food and shelter.",
            spend.physiological, min_physiological
        ));
    }

    let safety_met = physiological_met && {
        let min_safety = needs.minimum(NeedCategory::Safety, income);
        let met = spend.safety >= min_safety;
        if !met {
            recommendations.push(format!(
                "Your safety expenses (₹{}) are below the recommended minimum (₹{:.2}). Ensure you allocate enough for insurance, emergency savings, or financial security.",
                spend.safety, min_safety
            ));
        }
        met
    };

    if physiological_met && safety_met {
        let min_social = needs.minimum(NeedCategory::Social, income);
        if spend.social < min_social {
            recommendations.push(format!(
                "Your social expenses (₹{}) are below the recommended minimum (₹{:.2}). Consider allocating more for social activities to improve your relationships and well-being.",
                spend.social, min_social
            ));
        }

        let min_esteem = needs.minimum(NeedCategory::Esteem, income);
        if spend.esteem < min_esteem {
            recommendations.push(format!(
                "Your esteem expenses (₹{}) are below the recommended minimum (₹{:.2}). Allocate some funds for education or personal achievements.",
                spend.esteem, min_esteem
            ));
        }

        // Never fires: this block only runs once both lower levels are funded.
        // Kept as the documented rule until the intended condition is settled.
        if spend.self_actualization > 0.0 && (!physiological_met || !safety_met) {
            recommendations.push(format!(
                "You’re spending ₹{} on self-actualization (e.g., hobbies), but your basic needs aren’t fully met. Reallocate these funds to physiological or safety needs.",
                spend.self_actualization
            ));
        }
    }

    recommendations
}
