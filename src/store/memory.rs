use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::error::AppError;
use crate::store::{collections, RecordStore, ROW_ID_FIELD};

/// Per-collection unique business keys the store enforces on create.
const UNIQUE_KEYS: &[(&str, &str)] = &[
    (collections::SHIPMENTS, "tracking_number"),
    (collections::USERS, "email"),
];

/// In-memory record store. Backs the binary and the test suites; a
/// network-backed implementation plugs in behind the same trait.
pub struct MemoryStore {
    data: DashMap<String, DashMap<u64, Value>>,
    next_row: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            next_row: AtomicU64::new(1),
        }
    }

    fn unique_key_for(collection: &str) -> Option<&'static str> {
        UNIQUE_KEYS
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, field)| *field)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, collection: &str, mut record: Value) -> Result<Value, AppError> {
        let rows = self
            .data
            .entry(collection.to_string())
            .or_insert_with(DashMap::new);

        if let Some(field) = Self::unique_key_for(collection) {
            if let Some(key) = record.get(field).and_then(Value::as_str) {
                let taken = rows
                    .iter()
                    .any(|row| row.value().get(field).and_then(Value::as_str) == Some(key));
                if taken {
                    return Err(AppError::Duplicate(format!(
                        "{collection} already holds {field} {key}"
                    )));
                }
            }
        }

        let row = self.next_row.fetch_add(1, Ordering::Relaxed);
        if let Some(fields) = record.as_object_mut() {
            fields.insert(ROW_ID_FIELD.to_string(), row.into());
        }

        rows.insert(row, record.clone());
        Ok(record)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, AppError> {
        let rows = match self.data.get(collection) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let mut records: Vec<(u64, Value)> = rows
            .iter()
            .map(|row| (*row.key(), row.value().clone()))
            .collect();
        records.sort_by_key(|(row, _)| *row);

        Ok(records.into_iter().map(|(_, record)| record).collect())
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, AppError> {
        let records = self.list(collection).await?;
        Ok(records
            .into_iter()
            .filter(|record| record.get(field).and_then(Value::as_str) == Some(value))
            .collect())
    }

    async fn update(&self, collection: &str, row: u64, mut record: Value) -> Result<Value, AppError> {
        let rows = self
            .data
            .get(collection)
            .ok_or_else(|| AppError::NotFound(format!("collection {collection} is empty")))?;

        if !rows.contains_key(&row) {
            return Err(AppError::NotFound(format!(
                "{collection} has no row {row}"
            )));
        }

        if let Some(fields) = record.as_object_mut() {
            fields.insert(ROW_ID_FIELD.to_string(), row.into());
        }

        rows.insert(row, record.clone());
        Ok(record)
    }

    async fn delete(&self, collection: &str, row: u64) -> Result<(), AppError> {
        let rows = self
            .data
            .get(collection)
            .ok_or_else(|| AppError::NotFound(format!("collection {collection} is empty")))?;

        rows.remove(&row)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("{collection} has no row {row}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::MemoryStore;
    use crate::error::AppError;
    use crate::store::{collections, row_id, RecordStore};

    #[tokio::test]
    async fn create_assigns_monotonic_row_ids() {
        let store = MemoryStore::new();

        let first = store
            .create(collections::BRANCHES, json!({ "name": "Central" }))
            .await
            .unwrap();
        let second = store
            .create(collections::BRANCHES, json!({ "name": "North" }))
            .await
            .unwrap();

        assert!(row_id(&first).unwrap() < row_id(&second).unwrap());
    }

    #[tokio::test]
    async fn duplicate_tracking_number_is_rejected() {
        let store = MemoryStore::new();
        let record = json!({ "tracking_number": "TRK100001" });

        store
            .create(collections::SHIPMENTS, record.clone())
            .await
            .unwrap();

        match store.create(collections::SHIPMENTS, record).await {
            Err(AppError::Duplicate(_)) => {}
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_by_matches_exactly_one_field() {
        let store = MemoryStore::new();
        store
            .create(collections::SHIPMENTS, json!({ "tracking_number": "TRK1", "customer_id": "c1" }))
            .await
            .unwrap();
        store
            .create(collections::SHIPMENTS, json!({ "tracking_number": "TRK2", "customer_id": "c2" }))
            .await
            .unwrap();

        let hits = store
            .find_by(collections::SHIPMENTS, "customer_id", "c2")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["tracking_number"], "TRK2");
    }

    #[tokio::test]
    async fn update_unknown_row_is_not_found() {
        let store = MemoryStore::new();
        store
            .create(collections::FLEET, json!({ "number": "KA01" }))
            .await
            .unwrap();

        match store.update(collections::FLEET, 99, json!({})).await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = MemoryStore::new();
        let created = store
            .create(collections::STAFF, json!({ "name": "Ravi" }))
            .await
            .unwrap();
        let row = row_id(&created).unwrap();

        store.delete(collections::STAFF, row).await.unwrap();
        assert!(store.list(collections::STAFF).await.unwrap().is_empty());
    }
}
