use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::lifecycle;
use crate::models::shipment::{NewShipment, Shipment, ShipmentStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shipments", post(create_shipment).get(list_shipments))
        .route(
            "/shipments/:tracking",
            get(get_shipment).delete(remove_shipment),
        )
        .route("/shipments/:tracking/status", patch(update_status))
        .route("/shipments/:tracking/cancel", post(cancel_shipment))
}

async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewShipment>,
) -> Result<Json<Shipment>, AppError> {
    let shipment = lifecycle::create_shipment(&state, payload).await?;
    Ok(Json(shipment))
}

#[derive(Deserialize)]
struct ListQuery {
    customer_id: Option<String>,
}

async fn list_shipments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Shipment>>, AppError> {
    let shipments = match query.customer_id {
        Some(customer_id) => lifecycle::shipments_for_customer(&state, &customer_id).await?,
        None => lifecycle::list_shipments(&state).await?,
    };
    Ok(Json(shipments))
}

async fn get_shipment(
    State(state): State<Arc<AppState>>,
    Path(tracking): Path<String>,
) -> Result<Json<Shipment>, AppError> {
    let shipment = lifecycle::get_shipment(&state, &tracking).await?;
    Ok(Json(shipment))
}

#[derive(Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(tracking): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Shipment>, AppError> {
    let status = parse_status(&payload.status)?;
    let shipment = lifecycle::update_status(&state, &tracking, status).await?;
    Ok(Json(shipment))
}

#[derive(Deserialize)]
struct CancelRequest {
    #[serde(default)]
    reason: String,
}

async fn cancel_shipment(
    State(state): State<Arc<AppState>>,
    Path(tracking): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> Result<Json<Shipment>, AppError> {
    let shipment = lifecycle::cancel_shipment(&state, &tracking, &payload.reason).await?;
    Ok(Json(shipment))
}

async fn remove_shipment(
    State(state): State<Arc<AppState>>,
    Path(tracking): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    lifecycle::remove_shipment(&state, &tracking).await?;
    Ok(Json(serde_json::json!({ "removed": tracking })))
}

/// Accepts the display label ("Out for Delivery") or the store token
/// ("OUT_FOR_DELIVERY").
fn parse_status(raw: &str) -> Result<ShipmentStatus, AppError> {
    ShipmentStatus::from_label(raw)
        .or_else(|| ShipmentStatus::from_record_token(raw))
        .ok_or_else(|| AppError::Validation(format!("unknown status: {raw}")))
}
