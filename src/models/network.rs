use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::shipment::PaymentMode;
use crate::models::user::Role;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BranchKind {
    Branch,
    Hub,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OperationalStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub kind: BranchKind,
    pub location: String,
    pub manager: String,
    pub staff_count: u32,
    pub status: OperationalStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VehicleStatus {
    Available,
    InTransit,
    Delivering,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Registration plate; doubles as the identifier.
    pub number: String,
    pub kind: String,
    pub driver: Option<String>,
    pub status: VehicleStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StaffRole {
    Manager,
    Driver,
    Agent,
    Sorter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub role: StaffRole,
    pub branch_id: Option<Uuid>,
    pub status: OperationalStatus,
    pub phone: String,
    pub documents_submitted: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub tracking_number: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub status: TransactionStatus,
    pub payment_mode: PaymentMode,
}

/// Which portal audience a notification is shown to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationScope {
    Customer,
    Agent,
    Admin,
    All,
}

impl NotificationScope {
    /// Whether a notification with this scope is visible to `role`.
    pub fn visible_to(&self, role: Role) -> bool {
        match self {
            NotificationScope::All => true,
            NotificationScope::Customer => role == Role::Customer,
            NotificationScope::Agent => role == Role::Agent,
            NotificationScope::Admin => role == Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub scope: NotificationScope,
    pub created_at: DateTime<Utc>,
}
