//! City listing handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::AppState;
use wealthsync_core::CityListing;

/// GET /api/cities - List known cities with their states
pub async fn list_cities(State(state): State<Arc<AppState>>) -> Json<Vec<CityListing>> {
    Json(state.calculator.list_cities())
}
