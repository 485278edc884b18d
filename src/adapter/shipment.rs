use serde_json::{json, Value};

use crate::adapter::{date_field, f64_field, nested_str_field, opt_str_field, str_field};
use crate::error::AppError;
use crate::models::shipment::{PaymentMode, ServiceTier, Shipment, ShipmentStatus};

/// Maps a store record onto the flat view model.
///
/// Total over well-formed records: missing contact objects flatten to
/// empty strings, unknown enum tokens fall back to their defaults. The
/// only hard requirement is the tracking number.
pub fn shipment_to_view(record: &Value) -> Result<Shipment, AppError> {
    let tracking_number = record
        .get("tracking_number")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Mapping("shipment record has no tracking_number".to_string()))?
        .to_string();

    let status = record
        .get("status")
        .and_then(Value::as_str)
        .and_then(ShipmentStatus::from_record_token)
        .unwrap_or(ShipmentStatus::Booked);

    let service_tier = record
        .get("service_tier")
        .and_then(Value::as_str)
        .and_then(ServiceTier::from_record_token)
        .unwrap_or(ServiceTier::Standard);

    let payment_mode = record
        .get("payment_mode")
        .and_then(Value::as_str)
        .and_then(PaymentMode::from_record_token)
        .unwrap_or(PaymentMode::Cash);

    Ok(Shipment {
        tracking_number,
        customer_id: str_field(record, "customer_id"),
        sender_name: nested_str_field(record, "sender", "name"),
        sender_phone: nested_str_field(record, "sender", "phone"),
        sender_address: nested_str_field(record, "sender", "address"),
        sender_city: nested_str_field(record, "sender", "city"),
        sender_pincode: nested_str_field(record, "sender", "pincode"),
        receiver_name: nested_str_field(record, "receiver", "name"),
        receiver_phone: nested_str_field(record, "receiver", "phone"),
        receiver_address: nested_str_field(record, "receiver", "address"),
        receiver_city: nested_str_field(record, "receiver", "city"),
        receiver_pincode: nested_str_field(record, "receiver", "pincode"),
        weight_kg: f64_field(record, "weight_kg"),
        service_tier,
        payment_mode,
        cost: f64_field(record, "cost"),
        status,
        booked_at: date_field(record, "booked_at").unwrap_or(chrono::DateTime::UNIX_EPOCH),
        estimated_delivery: date_field(record, "estimated_delivery"),
        delivered_at: date_field(record, "delivered_at"),
        payment_ref: opt_str_field(record, "payment_ref"),
        cancellation_reason: opt_str_field(record, "cancellation_reason"),
    })
}

/// Maps the view model back onto the store's nested, token-heavy shape.
pub fn shipment_to_record(shipment: &Shipment) -> Value {
    json!({
        "tracking_number": shipment.tracking_number,
        "customer_id": shipment.customer_id,
        "sender": {
            "name": shipment.sender_name,
            "phone": shipment.sender_phone,
            "address": shipment.sender_address,
            "city": shipment.sender_city,
            "pincode": shipment.sender_pincode,
        },
        "receiver": {
            "name": shipment.receiver_name,
            "phone": shipment.receiver_phone,
            "address": shipment.receiver_address,
            "city": shipment.receiver_city,
            "pincode": shipment.receiver_pincode,
        },
        "weight_kg": shipment.weight_kg,
        "service_tier": shipment.service_tier.record_token(),
        "payment_mode": shipment.payment_mode.record_token(),
        "cost": shipment.cost,
        "status": shipment.status.record_token(),
        "booked_at": shipment.booked_at.to_rfc3339(),
        "estimated_delivery": shipment.estimated_delivery.map(|d| d.to_rfc3339()),
        "delivered_at": shipment.delivered_at.map(|d| d.to_rfc3339()),
        "payment_ref": shipment.payment_ref,
        "cancellation_reason": shipment.cancellation_reason,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::{shipment_to_record, shipment_to_view};
    use crate::error::AppError;
    use crate::models::shipment::{PaymentMode, ServiceTier, Shipment, ShipmentStatus};

    fn sample() -> Shipment {
        Shipment {
            tracking_number: "TRK100001".to_string(),
            customer_id: "9a1f".to_string(),
            sender_name: "Asha Rao".to_string(),
            sender_phone: "9876543210".to_string(),
            sender_address: "12 MG Road".to_string(),
            sender_city: "Bengaluru".to_string(),
            sender_pincode: "560001".to_string(),
            receiver_name: "Vikram Shah".to_string(),
            receiver_phone: "9123456780".to_string(),
            receiver_address: "4 Marine Drive".to_string(),
            receiver_city: "Mumbai".to_string(),
            receiver_pincode: "400001".to_string(),
            weight_kg: 2.0,
            service_tier: ServiceTier::Express,
            payment_mode: PaymentMode::Upi,
            cost: 200.0,
            status: ShipmentStatus::InTransit,
            booked_at: Utc::now(),
            estimated_delivery: Some(Utc::now()),
            delivered_at: None,
            payment_ref: Some("pay_0042".to_string()),
            cancellation_reason: None,
        }
    }

    #[test]
    fn round_trip_preserves_identity_status_and_cost() {
        let original = sample();
        let restored = shipment_to_view(&shipment_to_record(&original)).unwrap();

        assert_eq!(restored.tracking_number, original.tracking_number);
        assert_eq!(restored.status, original.status);
        assert_eq!(restored.cost, original.cost);
        assert_eq!(restored.sender_city, original.sender_city);
        assert_eq!(restored.receiver_pincode, original.receiver_pincode);
        assert_eq!(restored.service_tier, original.service_tier);
        assert_eq!(restored.payment_mode, original.payment_mode);
        assert_eq!(restored.payment_ref, original.payment_ref);
    }

    #[test]
    fn record_side_uses_upper_snake_tokens_and_nested_contacts() {
        let record = shipment_to_record(&sample());

        assert_eq!(record["status"], "IN_TRANSIT");
        assert_eq!(record["service_tier"], "EXPRESS");
        assert_eq!(record["payment_mode"], "UPI");
        assert_eq!(record["sender"]["city"], "Bengaluru");
        assert_eq!(record["receiver"]["name"], "Vikram Shah");
    }

    #[test]
    fn missing_contacts_flatten_to_empty_strings() {
        let record = json!({ "tracking_number": "TRK7", "status": "BOOKED" });
        let view = shipment_to_view(&record).unwrap();

        assert_eq!(view.sender_name, "");
        assert_eq!(view.receiver_city, "");
        assert_eq!(view.weight_kg, 0.0);
        assert_eq!(view.status, ShipmentStatus::Booked);
        assert!(view.payment_ref.is_none());
    }

    #[test]
    fn unknown_status_token_degrades_to_booked() {
        let record = json!({ "tracking_number": "TRK8", "status": "TELEPORTED" });
        let view = shipment_to_view(&record).unwrap();
        assert_eq!(view.status, ShipmentStatus::Booked);
    }

    #[test]
    fn missing_tracking_number_is_a_mapping_error() {
        let record = json!({ "status": "BOOKED", "cost": 100.0 });
        match shipment_to_view(&record) {
            Err(AppError::Mapping(_)) => {}
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn wire_labels_match_the_fixed_table() {
        let expected = [
            (ShipmentStatus::Booked, "BOOKED", "Booked"),
            (ShipmentStatus::InTransit, "IN_TRANSIT", "In Transit"),
            (ShipmentStatus::OutForDelivery, "OUT_FOR_DELIVERY", "Out for Delivery"),
            (ShipmentStatus::Delivered, "DELIVERED", "Delivered"),
            (ShipmentStatus::Cancelled, "CANCELLED", "Cancelled"),
            (ShipmentStatus::FailedAttempt, "FAILED_ATTEMPT", "Failed Attempt"),
        ];

        for (status, token, label) in expected {
            assert_eq!(status.record_token(), token);
            assert_eq!(status.label(), label);
            assert_eq!(ShipmentStatus::from_record_token(token), Some(status));
            assert_eq!(ShipmentStatus::from_label(label), Some(status));
        }

        assert_eq!(ServiceTier::SameDay.record_token(), "SAME_DAY");
        assert_eq!(ServiceTier::SameDay.label(), "Same Day");
    }
}
