//! Experiment assignment handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use switchyard_types::experiment::Assignment;

use crate::http::error::AppError;
use crate::http::extractors::query::{AssignQuery, ValidatedQuery};
use crate::state::AppState;

/// GET /assign - Deterministically assign a user to an experiment variant.
pub async fn assign(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AssignQuery>,
) -> Result<Json<Assignment>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    query.validate()?;

    let assignment = state.selector.select(&query.experiment_name, &query.user_id)?;
    let elapsed = start.elapsed().as_micros() as u64;

    tracing::info!(
        %request_id,
        experiment = %assignment.experiment_name,
        user_id = %assignment.user_id,
        variant = %assignment.variant,
        elapsed_us = elapsed,
        "assigned variant"
    );

    Ok(Json(assignment))
}
