// src/routes/stats.rs

use axum::{extract::{Query, State}, Json};

use crate::error::AppResult;
use crate::filters::{FilterCriteria, StudentFilterParams};
use crate::models::{Charts, Summary};
use crate::{queries, AppState};

/// GET /stats/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Query(q): Query<StudentFilterParams>,
) -> AppResult<Json<Summary>> {
    let criteria = FilterCriteria::from(q);
    let summary = queries::stats::summary(&state.pool, &criteria).await?;
    Ok(Json(summary))
}

/// GET /stats/charts
pub async fn get_charts(
    State(state): State<AppState>,
    Query(q): Query<StudentFilterParams>,
) -> AppResult<Json<Charts>> {
    let criteria = FilterCriteria::from(q);
    let charts = queries::stats::charts(&state.pool, &criteria).await?;
    Ok(Json(charts))
}
