use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Customer,
    Agent,
    Admin,
}

impl Role {
    pub fn record_token(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Agent => "AGENT",
            Role::Admin => "ADMIN",
        }
    }

    pub fn from_record_token(token: &str) -> Option<Self> {
        match token {
            "CUSTOMER" => Some(Role::Customer),
            "AGENT" => Some(Role::Agent),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Registration input. The password lives only in the persistence record,
/// never in the view model.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub pincode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub avatar_url: Option<String>,
}
