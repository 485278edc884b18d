use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::adapter::record_token;
use crate::error::AppError;
use crate::models::network::{Notification, NotificationScope};
use crate::models::user::Role;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/notifications", get(list_notifications).post(add_notification))
}

#[derive(Deserialize)]
struct ListQuery {
    role: Option<String>,
}

/// Notifications for the requested role (or the logged-in user's role),
/// most recent first.
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let role = match query.role {
        Some(raw) => parse_role(&raw)?,
        None => state
            .current_user()
            .map(|user| user.role)
            .ok_or_else(|| AppError::Validation("role is required".to_string()))?,
    };

    Ok(Json(state.notifications_for_role(role)))
}

#[derive(Deserialize)]
struct AddNotificationRequest {
    message: String,
    scope: NotificationScope,
}

async fn add_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddNotificationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    state.add_notification(payload.message, payload.scope);
    Ok(Json(serde_json::json!({ "status": "queued" })))
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    Role::from_record_token(&record_token(raw))
        .ok_or_else(|| AppError::Validation(format!("unknown role: {raw}")))
}
