use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{SymptomLogEntry, SymptomReport};
use crate::AppState;

/// Choices offered by the tracker UI. Advisory only; free-form names are
/// accepted on write.
pub const SYMPTOM_CATALOG: [&str; 9] = [
    "Cramps",
    "Headache",
    "Fatigue",
    "Bloating",
    "Breast Tenderness",
    "Mood Swings",
    "Acne",
    "Back Pain",
    "Nausea",
];

pub const MOOD_CATALOG: [&str; 8] = [
    "Happy",
    "Calm",
    "Irritable",
    "Anxious",
    "Sad",
    "Energetic",
    "Tired",
    "Stressed",
];

#[derive(Deserialize)]
struct UserQuery {
    user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewSymptomLog {
    pub user_id: Uuid,
    pub symptoms: Vec<SymptomReport>,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize)]
struct SymptomOptions {
    symptoms: Vec<&'static str>,
    moods: Vec<&'static str>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/symptoms", post(log_symptoms).get(get_symptom_history))
        .route("/symptoms/options", get(get_symptom_options))
        .route("/symptoms/:id", delete(delete_symptom_log))
        .with_state(state)
}

async fn log_symptoms(
    State(state): State<AppState>,
    Json(body): Json<NewSymptomLog>,
) -> Result<(StatusCode, Json<SymptomLogEntry>), (StatusCode, String)> {
    if body.symptoms.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "At least one symptom is required".into(),
        ));
    }
    for report in &body.symptoms {
        if report.name.trim().is_empty() {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                "Symptom name cannot be empty".into(),
            ));
        }
        if !(1..=5).contains(&report.intensity) {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Intensity {} for {} is out of range (expected 1-5)",
                    report.intensity, report.name
                ),
            ));
        }
    }

    let entry = state.store.create_symptom_log(
        body.user_id,
        body.symptoms,
        body.mood,
        body.notes,
        state.clock.now(),
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_symptom_history(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<SymptomLogEntry>> {
    Json(state.store.symptom_logs(query.user_id))
}

async fn delete_symptom_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.store.delete_symptom_log(query.user_id, id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "No symptom log found".into()))
    }
}

async fn get_symptom_options() -> Json<SymptomOptions> {
    Json(SymptomOptions {
        symptoms: SYMPTOM_CATALOG.to_vec(),
        moods: MOOD_CATALOG.to_vec(),
    })
}
