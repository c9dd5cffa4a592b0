use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CycleRecord, CycleSummary, DEFAULT_CYCLE_LENGTH};
use crate::phase;
use crate::AppState;

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewCycle {
    pub user_id: Uuid,
    pub last_period_start: NaiveDate,
    pub last_period_end: NaiveDate,
    pub cycle_length: Option<i64>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle", get(get_cycle_summary).post(log_cycle))
        .with_state(state)
}

async fn log_cycle(
    State(state): State<AppState>,
    Json(body): Json<NewCycle>,
) -> Result<StatusCode, (StatusCode, String)> {
    let cycle_length = body.cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH);

    let record = CycleRecord::new(body.last_period_start, body.last_period_end, cycle_length)
        .map_err(|e| {
            tracing::error!("❌ Rejected period baseline: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        })?;

    if record.low_confidence {
        tracing::info!(
            "ℹ️ Cycle length {} is outside the plausible band, predictions flagged low-confidence",
            record.cycle_length
        );
    }

    state.store.set_cycle(body.user_id, record);
    Ok(StatusCode::CREATED)
}

async fn get_cycle_summary(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<CycleSummary>, StatusCode> {
    // No baseline logged yet means no prediction, not a failure.
    let Some(record) = state.store.cycle(params.user_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    Ok(Json(phase::summarize(&record, state.clock.today())))
}
