use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Notification;
use crate::AppState;

#[derive(Deserialize)]
struct UserQuery {
    user_id: Uuid,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub user_id: Uuid,
}

#[derive(Serialize)]
struct InboxResponse {
    unread: usize,
    notifications: Vec<Notification>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/notifications",
            get(get_inbox).delete(clear_notifications),
        )
        .route("/notifications/read", post(mark_all_read))
        .with_state(state)
}

async fn get_inbox(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<InboxResponse> {
    let notifications = state.store.notifications(query.user_id);
    let unread = notifications.iter().filter(|n| !n.read).count();
    Json(InboxResponse {
        unread,
        notifications,
    })
}

async fn mark_all_read(
    State(state): State<AppState>,
    Json(body): Json<MarkReadRequest>,
) -> StatusCode {
    state.store.mark_notifications_read(body.user_id);
    StatusCode::NO_CONTENT
}

async fn clear_notifications(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> StatusCode {
    state.store.clear_notifications(query.user_id);
    StatusCode::NO_CONTENT
}
