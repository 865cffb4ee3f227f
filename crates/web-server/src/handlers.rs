use crate::{error::AppError, AppState};
use analytics::DashboardReport;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use core_types::DateRange;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters of the dashboard endpoint. A missing bound defaults to
/// the first or last purchase day in the data.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// # GET /api/date-bounds
/// The selectable window: first and last purchase day of the all-orders table.
pub async fn get_date_bounds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DateRange>, AppError> {
    let bounds = state
        .dataset
        .date_bounds()
        .ok_or_else(|| AppError::NotFound("The order table is empty".to_string()))?;
    Ok(Json(bounds))
}

/// # GET /api/dashboard?start=YYYY-MM-DD&end=YYYY-MM-DD
/// Recomputes every derived table for the requested window.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardReport>, AppError> {
    let range = state.dataset.resolve_range(query.start, query.end)?;
    let report = state.engine.calculate(
        state.dataset.all_orders(),
        state.dataset.raw_orders(),
        range,
    )?;
    Ok(Json(report))
}
