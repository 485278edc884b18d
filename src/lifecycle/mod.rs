pub mod transitions;

use std::time::Instant;

use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::adapter::shipment::{shipment_to_record, shipment_to_view};
use crate::error::AppError;
use crate::models::network::{NotificationScope, Transaction, TransactionStatus};
use crate::models::shipment::{NewShipment, PaymentMode, Shipment, ShipmentStatus};
use crate::rates::calculate_rate;
use crate::state::AppState;
use crate::store::{collections, row_id, RecordStore};

pub async fn create_shipment(state: &AppState, new: NewShipment) -> Result<Shipment, AppError> {
    let start = Instant::now();
    let result = create_inner(state, new).await;
    observe(state, "create", start, result.is_ok());
    result
}

pub async fn update_status(
    state: &AppState,
    tracking: &str,
    new_status: ShipmentStatus,
) -> Result<Shipment, AppError> {
    let start = Instant::now();
    let result = transition_inner(state, tracking, new_status, None).await;
    observe(state, "update_status", start, result.is_ok());
    result
}

pub async fn cancel_shipment(
    state: &AppState,
    tracking: &str,
    reason: &str,
) -> Result<Shipment, AppError> {
    let start = Instant::now();
    let result =
        transition_inner(state, tracking, ShipmentStatus::Cancelled, Some(reason)).await;
    observe(state, "cancel", start, result.is_ok());
    result
}

/// Store-backed read; the cache is not consulted or touched.
pub async fn get_shipment(state: &AppState, tracking: &str) -> Result<Shipment, AppError> {
    let record = load_record(state, tracking).await?;
    shipment_to_view(&record).inspect_err(|err| error!(tracking, error = %err, "unreadable shipment record"))
}

pub async fn list_shipments(state: &AppState) -> Result<Vec<Shipment>, AppError> {
    let records = state.store.list(collections::SHIPMENTS).await?;
    records_to_views(records)
}

pub async fn shipments_for_customer(
    state: &AppState,
    customer_id: &str,
) -> Result<Vec<Shipment>, AppError> {
    let records = state
        .store
        .find_by(collections::SHIPMENTS, "customer_id", customer_id)
        .await?;
    records_to_views(records)
}

/// History cleanup, not a lifecycle transition: drops the record and
/// evicts the cache entry.
pub async fn remove_shipment(state: &AppState, tracking: &str) -> Result<(), AppError> {
    let record = load_record(state, tracking).await?;
    let row = row_id(&record)
        .ok_or_else(|| AppError::Internal(format!("shipment {tracking} has no row id")))?;

    state.store.delete(collections::SHIPMENTS, row).await?;
    state.shipments.remove(tracking);
    refresh_shipment_gauge(state);

    info!(tracking, "shipment history removed");
    Ok(())
}

async fn create_inner(state: &AppState, new: NewShipment) -> Result<Shipment, AppError> {
    if new.sender.name.trim().is_empty() {
        return Err(AppError::Validation("sender name is required".to_string()));
    }
    if new.receiver.name.trim().is_empty() {
        return Err(AppError::Validation("receiver name is required".to_string()));
    }
    if new.weight_kg <= 0.0 {
        return Err(AppError::Validation(
            "weight must be greater than zero".to_string(),
        ));
    }

    let cost = calculate_rate(new.weight_kg, new.service_tier, new.payment_mode);
    let tracking = state.next_tracking_number();
    let now = Utc::now();

    let payment_ref = match new.payment_mode {
        PaymentMode::Upi | PaymentMode::Card => {
            Some(format!("PAY-{}", Uuid::new_v4().simple()))
        }
        PaymentMode::Cash => None,
    };

    let shipment = Shipment {
        tracking_number: tracking.clone(),
        customer_id: new.customer_id,
        sender_name: new.sender.name,
        sender_phone: new.sender.phone,
        sender_address: new.sender.address,
        sender_city: new.sender.city,
        sender_pincode: new.sender.pincode,
        receiver_name: new.receiver.name,
        receiver_phone: new.receiver.phone,
        receiver_address: new.receiver.address,
        receiver_city: new.receiver.city,
        receiver_pincode: new.receiver.pincode,
        weight_kg: new.weight_kg,
        service_tier: new.service_tier,
        payment_mode: new.payment_mode,
        cost,
        status: ShipmentStatus::Booked,
        booked_at: now,
        estimated_delivery: Some(now + Duration::days(new.service_tier.transit_days())),
        delivered_at: None,
        payment_ref,
        cancellation_reason: None,
    };

    state
        .store
        .create(collections::SHIPMENTS, shipment_to_record(&shipment))
        .await?;

    let transaction = Transaction {
        id: Uuid::new_v4(),
        tracking_number: tracking.clone(),
        date: now,
        amount: cost,
        status: match new.payment_mode {
            PaymentMode::Cash => TransactionStatus::Pending,
            _ => TransactionStatus::Completed,
        },
        payment_mode: new.payment_mode,
    };
    let transaction_record = serde_json::to_value(&transaction)
        .map_err(|err| AppError::Internal(format!("transaction serialize failed: {err}")))?;
    state
        .store
        .create(collections::TRANSACTIONS, transaction_record)
        .await?;

    state
        .shipments
        .insert(tracking.clone(), shipment.clone());
    state.transactions.insert(transaction.id, transaction);
    refresh_shipment_gauge(state);

    state.add_notification(
        format!("Shipment {tracking} booked"),
        NotificationScope::Customer,
    );
    state.add_notification(
        format!("New shipment {tracking} awaiting pickup"),
        NotificationScope::Agent,
    );

    info!(%tracking, cost, "shipment booked");
    Ok(shipment)
}

async fn transition_inner(
    state: &AppState,
    tracking: &str,
    new_status: ShipmentStatus,
    cancellation_reason: Option<&str>,
) -> Result<Shipment, AppError> {
    let record = load_record(state, tracking).await?;
    let row = row_id(&record)
        .ok_or_else(|| AppError::Internal(format!("shipment {tracking} has no row id")))?;
    let current = shipment_to_view(&record)
        .inspect_err(|err| error!(tracking, error = %err, "unreadable shipment record"))?;

    if !transitions::is_legal(current.status, new_status) {
        return Err(AppError::InvalidTransition {
            from: current.status.label().to_string(),
            to: new_status.label().to_string(),
        });
    }

    let mut updated = current;
    updated.status = new_status;
    if let Some(reason) = cancellation_reason {
        updated.cancellation_reason = Some(reason.to_string());
    }
    if new_status == ShipmentStatus::Delivered {
        updated.delivered_at = Some(Utc::now());
    }

    state
        .store
        .update(collections::SHIPMENTS, row, shipment_to_record(&updated))
        .await?;

    if new_status == ShipmentStatus::Delivered {
        settle_pending_transaction(state, tracking).await?;
    }

    // Concurrent updates for one tracking number are not versioned:
    // whichever confirmed response applies last wins.
    state
        .shipments
        .insert(tracking.to_string(), updated.clone());
    refresh_shipment_gauge(state);

    match new_status {
        ShipmentStatus::Cancelled => {
            state.add_notification(
                format!("Shipment {tracking} cancelled"),
                NotificationScope::Customer,
            );
        }
        _ => {
            state.add_notification(
                format!("Shipment {tracking} is now {}", new_status.label()),
                NotificationScope::Customer,
            );
        }
    }

    info!(tracking, status = new_status.label(), "shipment status updated");
    Ok(updated)
}

/// Cash bookings settle on delivery: the pending transaction flips to
/// completed in the store and in the cache.
async fn settle_pending_transaction(state: &AppState, tracking: &str) -> Result<(), AppError> {
    let records = state
        .store
        .find_by(collections::TRANSACTIONS, "tracking_number", tracking)
        .await?;

    for mut record in records {
        if record.get("status").and_then(Value::as_str) != Some("Pending") {
            continue;
        }
        let Some(row) = row_id(&record) else {
            continue;
        };

        if let Some(fields) = record.as_object_mut() {
            fields.insert("status".to_string(), "Completed".into());
        }
        let updated = state
            .store
            .update(collections::TRANSACTIONS, row, record)
            .await?;

        if let Ok(transaction) = serde_json::from_value::<Transaction>(updated) {
            state.transactions.insert(transaction.id, transaction);
        }
    }

    Ok(())
}

async fn load_record(state: &AppState, tracking: &str) -> Result<Value, AppError> {
    let mut matches = state
        .store
        .find_by(collections::SHIPMENTS, "tracking_number", tracking)
        .await?;

    if matches.is_empty() {
        return Err(AppError::NotFound(format!("shipment {tracking} not found")));
    }
    Ok(matches.remove(0))
}

fn records_to_views(records: Vec<Value>) -> Result<Vec<Shipment>, AppError> {
    records
        .iter()
        .map(|record| {
            shipment_to_view(record)
                .inspect_err(|err| error!(error = %err, "unreadable shipment record"))
        })
        .collect()
}

fn refresh_shipment_gauge(state: &AppState) {
    state
        .metrics
        .cache_entries
        .with_label_values(&["shipments"])
        .set(state.shipments.len() as f64);
}

fn observe(state: &AppState, op: &str, start: Instant, ok: bool) {
    let outcome = if ok { "success" } else { "error" };
    state
        .metrics
        .lifecycle_latency_seconds
        .with_label_values(&[op])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .lifecycle_ops_total
        .with_label_values(&[op, outcome])
        .inc();
}
