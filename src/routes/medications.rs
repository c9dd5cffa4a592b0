use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Local, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{hhmm, Frequency, MedicationEntry, MedicationPatch};
use crate::reminders;
use crate::AppState;

#[derive(Deserialize)]
struct UserQuery {
    user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewMedication {
    pub user_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct MedicationUpdate {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub patch: MedicationPatch,
}

#[derive(Serialize)]
struct NextMedication {
    name: String,
    #[serde(with = "hhmm")]
    time: NaiveTime,
    minutes_until: i64,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/medications", post(create_medication).get(get_medications))
        .route("/medications/next", get(get_next_medication))
        .route(
            "/medications/:id",
            patch(update_medication).delete(delete_medication),
        )
        .with_state(state)
}

async fn create_medication(
    State(state): State<AppState>,
    Json(body): Json<NewMedication>,
) -> Result<(StatusCode, Json<MedicationEntry>), (StatusCode, String)> {
    if body.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Medication name is required".into(),
        ));
    }
    if body.dosage.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Dosage is required".into(),
        ));
    }

    let entry = state.store.create_medication(
        body.user_id,
        body.name,
        body.dosage,
        body.frequency,
        body.time,
        body.notes,
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_medications(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<MedicationEntry>> {
    Json(state.store.medications(query.user_id))
}

async fn update_medication(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MedicationUpdate>,
) -> Result<Json<MedicationEntry>, (StatusCode, String)> {
    match state.store.update_medication(body.user_id, id, body.patch) {
        Some(updated) => Ok(Json(updated)),
        None => Err((StatusCode::NOT_FOUND, "No medication found".into())),
    }
}

async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.store.delete_medication(query.user_id, id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "No medication found".into()))
    }
}

async fn get_next_medication(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<NextMedication>, StatusCode> {
    let now = state.clock.now();
    match next_pending(&state.store.medications(query.user_id), now) {
        Some(next) => Ok(Json(next)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Soonest non-completed entry by wrapped minutes-until-due, so late-evening
/// lookups roll over to tomorrow morning's dose.
fn next_pending(medications: &[MedicationEntry], now: DateTime<Local>) -> Option<NextMedication> {
    medications
        .iter()
        .filter(|entry| !entry.completed)
        .map(|entry| (reminders::minutes_until_due(entry.time, now), entry))
        .min_by_key(|(wait, _)| *wait)
        .map(|(wait, entry)| NextMedication {
            name: entry.name.clone(),
            time: entry.time,
            minutes_until: wait,
        })
}
