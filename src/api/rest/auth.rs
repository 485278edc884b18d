use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::identity;
use crate::models::user::{NewUser, User};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    let user = identity::register(&state, payload).await?;
    Ok(Json(user))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = identity::login(&state, &payload.email, &payload.password).await?;
    Ok(Json(user))
}

async fn logout(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    identity::logout(&state);
    Json(json!({ "status": "logged out" }))
}

async fn session(State(state): State<Arc<AppState>>) -> Result<Json<User>, AppError> {
    state
        .current_user()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no active session".to_string()))
}
