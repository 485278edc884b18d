use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShipmentStatus {
    Booked,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
    FailedAttempt,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 6] = [
        ShipmentStatus::Booked,
        ShipmentStatus::InTransit,
        ShipmentStatus::OutForDelivery,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
        ShipmentStatus::FailedAttempt,
    ];

    /// Upper-snake token used by the record store.
    pub fn record_token(&self) -> &'static str {
        match self {
            ShipmentStatus::Booked => "BOOKED",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Cancelled => "CANCELLED",
            ShipmentStatus::FailedAttempt => "FAILED_ATTEMPT",
        }
    }

    pub fn from_record_token(token: &str) -> Option<Self> {
        match token {
            "BOOKED" => Some(ShipmentStatus::Booked),
            "IN_TRANSIT" => Some(ShipmentStatus::InTransit),
            "OUT_FOR_DELIVERY" => Some(ShipmentStatus::OutForDelivery),
            "DELIVERED" => Some(ShipmentStatus::Delivered),
            "CANCELLED" => Some(ShipmentStatus::Cancelled),
            "FAILED_ATTEMPT" => Some(ShipmentStatus::FailedAttempt),
            _ => None,
        }
    }

    /// Human-readable label shown by the portal. Note the lowercase "for"
    /// in "Out for Delivery" — the label table is fixed, not derived.
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Booked => "Booked",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::OutForDelivery => "Out for Delivery",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Cancelled => "Cancelled",
            ShipmentStatus::FailedAttempt => "Failed Attempt",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceTier {
    Standard,
    Express,
    SameDay,
}

impl ServiceTier {
    pub const ALL: [ServiceTier; 3] = [
        ServiceTier::Standard,
        ServiceTier::Express,
        ServiceTier::SameDay,
    ];

    pub fn record_token(&self) -> &'static str {
        match self {
            ServiceTier::Standard => "STANDARD",
            ServiceTier::Express => "EXPRESS",
            ServiceTier::SameDay => "SAME_DAY",
        }
    }

    pub fn from_record_token(token: &str) -> Option<Self> {
        match token {
            "STANDARD" => Some(ServiceTier::Standard),
            "EXPRESS" => Some(ServiceTier::Express),
            "SAME_DAY" => Some(ServiceTier::SameDay),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceTier::Standard => "Standard",
            ServiceTier::Express => "Express",
            ServiceTier::SameDay => "Same Day",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Days added to the booking date for the delivery estimate.
    pub fn transit_days(&self) -> i64 {
        match self {
            ServiceTier::Standard => 5,
            ServiceTier::Express => 2,
            ServiceTier::SameDay => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMode {
    Cash,
    Upi,
    Card,
}

impl PaymentMode {
    pub fn record_token(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
            PaymentMode::Card => "CARD",
        }
    }

    pub fn from_record_token(token: &str) -> Option<Self> {
        match token {
            "CASH" => Some(PaymentMode::Cash),
            "UPI" => Some(PaymentMode::Upi),
            "CARD" => Some(PaymentMode::Card),
            _ => None,
        }
    }
}

/// One side of a shipment: who hands the parcel over or receives it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub pincode: String,
}

/// Input for booking a shipment. Validated by the lifecycle manager.
#[derive(Debug, Clone, Deserialize)]
pub struct NewShipment {
    #[serde(default)]
    pub customer_id: String,
    pub sender: Contact,
    pub receiver: Contact,
    pub weight_kg: f64,
    pub service_tier: ServiceTier,
    pub payment_mode: PaymentMode,
}

/// Flat view model consumed by every portal screen. Contact blocks are
/// flattened; enumerations carry their internal variants, with labels
/// available via `label()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub tracking_number: String,
    pub customer_id: String,
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_address: String,
    pub sender_city: String,
    pub sender_pincode: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub receiver_city: String,
    pub receiver_pincode: String,
    pub weight_kg: f64,
    pub service_tier: ServiceTier,
    pub payment_mode: PaymentMode,
    pub cost: f64,
    pub status: ShipmentStatus,
    pub booked_at: DateTime<Utc>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub payment_ref: Option<String>,
    pub cancellation_reason: Option<String>,
}
