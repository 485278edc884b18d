use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::adapter::record_token;
use crate::error::AppError;
use crate::models::network::{
    Branch, BranchKind, OperationalStatus, StaffMember, StaffRole, Vehicle, VehicleStatus,
};
use crate::state::AppState;
use crate::store::{collections, row_id, RecordStore};

/// Network administration: branches, fleet, staff. Every mutation writes
/// the store first and applies to the cache only once confirmed.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/branches", get(list_branches).post(create_branch))
        .route("/branches/:id", axum::routing::delete(delete_branch))
        .route("/branches/:id/status", patch(update_branch_status))
        .route("/fleet", get(list_vehicles).post(create_vehicle))
        .route("/fleet/:number", axum::routing::delete(delete_vehicle))
        .route("/fleet/:number/status", patch(update_vehicle_status))
        .route("/staff", get(list_staff).post(create_staff))
        .route("/staff/:id", axum::routing::delete(delete_staff))
}

#[derive(Deserialize)]
struct CreateBranchRequest {
    name: String,
    kind: BranchKind,
    location: String,
    manager: String,
    #[serde(default)]
    staff_count: u32,
}

async fn create_branch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<Json<Branch>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("branch name is required".to_string()));
    }

    let branch = Branch {
        id: Uuid::new_v4(),
        name: payload.name,
        kind: payload.kind,
        location: payload.location,
        manager: payload.manager,
        staff_count: payload.staff_count,
        status: OperationalStatus::Active,
    };

    state
        .store
        .create(collections::BRANCHES, to_record(&branch)?)
        .await?;
    state.branches.insert(branch.id, branch.clone());
    refresh_gauge(&state, "branches", state.branches.len());

    Ok(Json(branch))
}

async fn list_branches(State(state): State<Arc<AppState>>) -> Json<Vec<Branch>> {
    let branches = state
        .branches
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(branches)
}

#[derive(Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

async fn update_branch_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Branch>, AppError> {
    let status = parse_operational_status(&payload.status)?;
    let (row, record) = load_row(&state, collections::BRANCHES, "id", &id.to_string()).await?;

    let mut branch: Branch = serde_json::from_value(record)
        .map_err(|err| AppError::Mapping(format!("branch record: {err}")))?;
    branch.status = status;

    state
        .store
        .update(collections::BRANCHES, row, to_record(&branch)?)
        .await?;
    state.branches.insert(branch.id, branch.clone());

    Ok(Json(branch))
}

async fn delete_branch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let (row, _) = load_row(&state, collections::BRANCHES, "id", &id.to_string()).await?;
    state.store.delete(collections::BRANCHES, row).await?;
    state.branches.remove(&id);
    refresh_gauge(&state, "branches", state.branches.len());

    Ok(Json(json!({ "removed": id })))
}

#[derive(Deserialize)]
struct CreateVehicleRequest {
    number: String,
    kind: String,
    #[serde(default)]
    driver: Option<String>,
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    if payload.number.trim().is_empty() {
        return Err(AppError::Validation(
            "vehicle number is required".to_string(),
        ));
    }

    let vehicle = Vehicle {
        number: payload.number,
        kind: payload.kind,
        driver: payload.driver,
        status: VehicleStatus::Available,
    };

    state
        .store
        .create(collections::FLEET, to_record(&vehicle)?)
        .await?;
    state
        .vehicles
        .insert(vehicle.number.clone(), vehicle.clone());
    refresh_gauge(&state, "fleet", state.vehicles.len());

    Ok(Json(vehicle))
}

async fn list_vehicles(State(state): State<Arc<AppState>>) -> Json<Vec<Vehicle>> {
    let vehicles = state
        .vehicles
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(vehicles)
}

async fn update_vehicle_status(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let status = parse_vehicle_status(&payload.status)?;
    let (row, record) = load_row(&state, collections::FLEET, "number", &number).await?;

    let mut vehicle: Vehicle = serde_json::from_value(record)
        .map_err(|err| AppError::Mapping(format!("vehicle record: {err}")))?;
    vehicle.status = status;

    state
        .store
        .update(collections::FLEET, row, to_record(&vehicle)?)
        .await?;
    state
        .vehicles
        .insert(vehicle.number.clone(), vehicle.clone());

    Ok(Json(vehicle))
}

async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (row, _) = load_row(&state, collections::FLEET, "number", &number).await?;
    state.store.delete(collections::FLEET, row).await?;
    state.vehicles.remove(&number);
    refresh_gauge(&state, "fleet", state.vehicles.len());

    Ok(Json(json!({ "removed": number })))
}

#[derive(Deserialize)]
struct CreateStaffRequest {
    name: String,
    role: StaffRole,
    #[serde(default)]
    branch_id: Option<Uuid>,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    documents_submitted: bool,
}

async fn create_staff(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<Json<StaffMember>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("staff name is required".to_string()));
    }

    let member = StaffMember {
        id: Uuid::new_v4(),
        name: payload.name,
        role: payload.role,
        branch_id: payload.branch_id,
        status: OperationalStatus::Active,
        phone: payload.phone,
        documents_submitted: payload.documents_submitted,
    };

    state
        .store
        .create(collections::STAFF, to_record(&member)?)
        .await?;
    state.staff.insert(member.id, member.clone());
    refresh_gauge(&state, "staff", state.staff.len());

    Ok(Json(member))
}

async fn list_staff(State(state): State<Arc<AppState>>) -> Json<Vec<StaffMember>> {
    let staff = state
        .staff
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(staff)
}

async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let (row, _) = load_row(&state, collections::STAFF, "id", &id.to_string()).await?;
    state.store.delete(collections::STAFF, row).await?;
    state.staff.remove(&id);
    refresh_gauge(&state, "staff", state.staff.len());

    Ok(Json(json!({ "removed": id })))
}

/// Accepts display form or store token: "In Transit", "IN_TRANSIT".
fn parse_vehicle_status(raw: &str) -> Result<VehicleStatus, AppError> {
    match record_token(raw).as_str() {
        "AVAILABLE" => Ok(VehicleStatus::Available),
        "IN_TRANSIT" => Ok(VehicleStatus::InTransit),
        "DELIVERING" => Ok(VehicleStatus::Delivering),
        _ => Err(AppError::Validation(format!(
            "unknown vehicle status: {raw}"
        ))),
    }
}

fn parse_operational_status(raw: &str) -> Result<OperationalStatus, AppError> {
    match record_token(raw).as_str() {
        "ACTIVE" => Ok(OperationalStatus::Active),
        "INACTIVE" => Ok(OperationalStatus::Inactive),
        _ => Err(AppError::Validation(format!("unknown status: {raw}"))),
    }
}

fn to_record<T: serde::Serialize>(entity: &T) -> Result<Value, AppError> {
    serde_json::to_value(entity)
        .map_err(|err| AppError::Internal(format!("record serialize failed: {err}")))
}

async fn load_row(
    state: &AppState,
    collection: &str,
    field: &str,
    value: &str,
) -> Result<(u64, Value), AppError> {
    let mut matches = state.store.find_by(collection, field, value).await?;
    if matches.is_empty() {
        return Err(AppError::NotFound(format!(
            "{collection} record {value} not found"
        )));
    }

    let record = matches.remove(0);
    let row = row_id(&record)
        .ok_or_else(|| AppError::Internal(format!("{collection} record {value} has no row id")))?;
    Ok((row, record))
}

fn refresh_gauge(state: &AppState, collection: &str, len: usize) {
    state
        .metrics
        .cache_entries
        .with_label_values(&[collection])
        .set(len as f64);
}
