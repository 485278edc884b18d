pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

pub mod collections {
    pub const USERS: &str = "users";
    pub const SHIPMENTS: &str = "shipments";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BRANCHES: &str = "branches";
    pub const FLEET: &str = "fleet";
    pub const STAFF: &str = "staff";
}

/// Internal row identifier the store stamps onto every created record.
/// Never surfaced to portal users; lookups key on business identifiers
/// (tracking number, email) via `find_by`.
pub const ROW_ID_FIELD: &str = "row_id";

pub fn row_id(record: &Value) -> Option<u64> {
    record.get(ROW_ID_FIELD).and_then(Value::as_u64)
}

/// The generic record store this core talks to. Collections hold
/// loosely-typed JSON records; queries are exact matches on one field.
/// Transport, retries and timeouts live behind an implementation, not
/// here.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a record, assigning its row id. Rejects records whose
    /// unique business key (e.g. a shipment's tracking number) collides
    /// with an existing row.
    async fn create(&self, collection: &str, record: Value) -> Result<Value, AppError>;

    async fn list(&self, collection: &str) -> Result<Vec<Value>, AppError>;

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, AppError>;

    async fn update(&self, collection: &str, row: u64, record: Value) -> Result<Value, AppError>;

    async fn delete(&self, collection: &str, row: u64) -> Result<(), AppError>;
}
