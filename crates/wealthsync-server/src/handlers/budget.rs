//! Budget calculation and history handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::read_json;
use crate::{AppError, AppState};
use wealthsync_core::{BudgetHistoryEntry, BudgetResult, BudgetSubmission};

/// POST /api/budget - Calculate a budget and record it in history
pub async fn calculate_budget(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<BudgetResult>, AppError> {
    let submission: BudgetSubmission = read_json(request).await?;
    let budget = submission.validate().map_err(AppError::from_core)?;

    let result = state
        .calculator
        .calculate_and_record(&budget, state.history.as_ref())
        .map_err(AppError::from_core)?;

    info!(
        location = %budget.location,
        recommendations = result.recommendations.len(),
        "Budget calculated"
    );

    Ok(Json(result))
}

/// Request body for budget history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /api/budget/history - List past calculations for an email
pub async fn budget_history(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<BudgetHistoryEntry>>, AppError> {
    let req: HistoryRequest = read_json(request).await?;
    let email = req.email.unwrap_or_default();

    let entries = state.history.query_by_email(&email)?;

    info!(count = entries.len(), "Budget history fetched");

    Ok(Json(entries))
}
