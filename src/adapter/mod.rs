pub mod shipment;
pub mod user;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Turns an upper-snake store token into its display form:
/// underscores become spaces, the token is lower-cased, then the first
/// letter of each word is capitalized. `IN_TRANSIT` -> `In Transit`.
///
/// `ShipmentStatus` and `ServiceTier` carry explicit label tables instead,
/// since the portal's wire contract spells "Out for Delivery" with a
/// lowercase connective.
pub fn display_token(token: &str) -> String {
    token
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact inverse of [`display_token`]: spaces become underscores and the
/// whole string is upper-cased. `In Transit` -> `IN_TRANSIT`.
pub fn record_token(display: &str) -> String {
    display.replace(' ', "_").to_uppercase()
}

// Field readers shared by the entity mappings. Absent or mistyped fields
// degrade to defaults; only structurally required identifiers may fail.

pub(crate) fn str_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn nested_str_field(record: &Value, object: &str, key: &str) -> String {
    record
        .get(object)
        .and_then(|nested| nested.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn f64_field(record: &Value, key: &str) -> f64 {
    record.get(key).and_then(Value::as_f64).unwrap_or_default()
}

pub(crate) fn opt_str_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn date_field(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{display_token, record_token};

    #[test]
    fn tokens_become_title_case() {
        assert_eq!(display_token("IN_TRANSIT"), "In Transit");
        assert_eq!(display_token("AVAILABLE"), "Available");
        assert_eq!(display_token("FAILED_ATTEMPT"), "Failed Attempt");
    }

    #[test]
    fn display_forms_become_tokens() {
        assert_eq!(record_token("In Transit"), "IN_TRANSIT");
        assert_eq!(record_token("Delivering"), "DELIVERING");
        assert_eq!(record_token("Out for Delivery"), "OUT_FOR_DELIVERY");
    }

    #[test]
    fn round_trips_are_lossless_for_store_tokens() {
        for token in ["BOOKED", "IN_TRANSIT", "DELIVERING", "ACTIVE", "FAILED_ATTEMPT"] {
            assert_eq!(record_token(&display_token(token)), token);
        }
    }
}
