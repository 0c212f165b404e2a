// src/routes/students.rs

use axum::{extract::{Query, State}, Json};

use crate::error::AppResult;
use crate::filters::{FilterCriteria, StudentFilterParams};
use crate::models::{FilterOptions, Student};
use crate::{queries, AppState};

/// GET /students
pub async fn list_students(
    State(state): State<AppState>,
    Query(q): Query<StudentFilterParams>,
) -> AppResult<Json<Vec<Student>>> {
    let criteria = FilterCriteria::from(q);
    let rows = queries::students::list(&state.pool, &criteria).await?;
    Ok(Json(rows))
}

/// GET /students/options
pub async fn filter_options(State(state): State<AppState>) -> AppResult<Json<FilterOptions>> {
    let options = queries::students::options(&state.pool).await?;
    Ok(Json(options))
}
