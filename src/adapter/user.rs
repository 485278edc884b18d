use serde_json::{json, Value};
use uuid::Uuid;

use crate::adapter::{nested_str_field, opt_str_field, str_field};
use crate::error::AppError;
use crate::models::user::{Role, User};

/// Maps a user record onto the view model. The stored password is never
/// carried across; only the identity manager reads it, directly off the
/// record. Email is the one structurally required field.
pub fn user_to_view(record: &Value) -> Result<User, AppError> {
    let email = record
        .get("email")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Mapping("user record has no email".to_string()))?
        .to_string();

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or(Uuid::nil());

    let role = record
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::from_record_token)
        .unwrap_or(Role::Customer);

    Ok(User {
        id,
        name: str_field(record, "name"),
        email,
        role,
        phone: nested_str_field(record, "contact", "phone"),
        address: nested_str_field(record, "contact", "address"),
        city: nested_str_field(record, "contact", "city"),
        pincode: nested_str_field(record, "contact", "pincode"),
        avatar_url: opt_str_field(record, "avatar_url"),
    })
}

/// Maps the view model back onto the store shape. Credentials are not part
/// of the view model, so the caller merges the password in separately.
pub fn user_to_record(user: &User) -> Value {
    json!({
        "id": user.id.to_string(),
        "name": user.name,
        "email": user.email,
        "role": user.role.record_token(),
        "contact": {
            "phone": user.phone,
            "address": user.address,
            "city": user.city,
            "pincode": user.pincode,
        },
        "avatar_url": user.avatar_url,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::{user_to_record, user_to_view};
    use crate::error::AppError;
    use crate::models::user::{Role, User};

    #[test]
    fn round_trip_preserves_identity_and_role() {
        let original = User {
            id: Uuid::from_u128(7),
            name: "Meera Iyer".to_string(),
            email: "meera@example.com".to_string(),
            role: Role::Agent,
            phone: "9000000001".to_string(),
            address: "7 Park Street".to_string(),
            city: "Kolkata".to_string(),
            pincode: "700016".to_string(),
            avatar_url: None,
        };

        let restored = user_to_view(&user_to_record(&original)).unwrap();
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.email, original.email);
        assert_eq!(restored.role, Role::Agent);
        assert_eq!(restored.city, original.city);
    }

    #[test]
    fn record_nests_contact_and_skips_password() {
        let user = User {
            id: Uuid::from_u128(9),
            name: "Dev".to_string(),
            email: "dev@example.com".to_string(),
            role: Role::Customer,
            phone: "9000000002".to_string(),
            address: String::new(),
            city: String::new(),
            pincode: String::new(),
            avatar_url: None,
        };

        let record = user_to_record(&user);
        assert_eq!(record["role"], "CUSTOMER");
        assert_eq!(record["contact"]["phone"], "9000000002");
        assert!(record.get("password").is_none());
    }

    #[test]
    fn sparse_record_degrades_to_defaults() {
        let record = json!({ "email": "bare@example.com" });
        let user = user_to_view(&record).unwrap();

        assert_eq!(user.id, Uuid::nil());
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "");
        assert_eq!(user.phone, "");
    }

    #[test]
    fn missing_email_is_a_mapping_error() {
        let record = json!({ "name": "No Mail" });
        match user_to_view(&record) {
            Err(AppError::Mapping(_)) => {}
            other => panic!("expected mapping error, got {other:?}"),
        }
    }
}
