use axum::{extract::rejection::JsonRejection, extract::State, Json};
use intake_types::{IntakeOutput, IntakeRequest};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Run one intake step for a thread
pub async fn run(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IntakeRequest>, JsonRejection>,
) -> ApiResult<Json<IntakeOutput>> {
    let Json(request) = payload?;
    let output = state.orchestrator.run(request).await?;
    Ok(Json(output))
}
