pub mod session;

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::adapter::user::{user_to_record, user_to_view};
use crate::error::AppError;
use crate::models::network::NotificationScope;
use crate::models::user::{NewUser, Role, User};
use crate::identity::session::SessionStore;
use crate::state::AppState;
use crate::store::{collections, RecordStore};

/// Exact-match credential lookup; the first matching record wins when
/// several share an email. Passwords are stored and compared in
/// plaintext. Both are known security gaps kept for compatibility with
/// the existing user records (see DESIGN.md) rather than fixed here.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<User, AppError> {
    let candidates = state
        .store
        .find_by(collections::USERS, "email", email)
        .await?;

    let record = candidates
        .into_iter()
        .find(|record| record.get("password").and_then(Value::as_str) == Some(password))
        .ok_or_else(|| AppError::NotFound("no user with matching credentials".to_string()))?;

    let user = user_to_view(&record)
        .inspect_err(|err| error!(email, error = %err, "unreadable user record"))?;

    state.sessions.save(&user)?;
    state.set_current_user(Some(user.clone()));

    info!(email, "login succeeded");
    Ok(user)
}

/// Self-service registration always yields a Customer; Agent and Admin
/// accounts are provisioned administratively.
pub async fn register(state: &AppState, new: NewUser) -> Result<User, AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if new.email.trim().is_empty() || !new.email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if new.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let existing = state
        .store
        .find_by(collections::USERS, "email", &new.email)
        .await?;
    if !existing.is_empty() {
        return Err(AppError::Duplicate(format!(
            "email {} is already registered",
            new.email
        )));
    }

    let user = User {
        id: Uuid::new_v4(),
        name: new.name,
        email: new.email,
        role: Role::Customer,
        phone: new.phone,
        address: new.address,
        city: new.city,
        pincode: new.pincode,
        avatar_url: None,
    };

    let mut record = user_to_record(&user);
    if let Some(fields) = record.as_object_mut() {
        fields.insert("password".to_string(), new.password.into());
    }
    state.store.create(collections::USERS, record).await?;

    state.add_notification(
        format!("New customer registered: {}", user.email),
        NotificationScope::Admin,
    );

    info!(email = %user.email, "customer registered");
    Ok(user)
}

/// Clears the durable session slot and the in-memory shipment cache.
pub fn logout(state: &AppState) {
    state.sessions.clear();
    state.set_current_user(None);
    state.shipments.clear();
    info!("session cleared");
}

/// Restores a previously saved session at startup without
/// re-authenticating.
pub fn restore_session(state: &AppState) {
    if let Some(user) = state.sessions.load() {
        info!(email = %user.email, "session restored");
        state.set_current_user(Some(user));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::identity::session::{MemorySessionStore, SessionStore};
    use crate::store::memory::MemoryStore;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemorySessionStore::new()),
            16,
        )
    }

    fn signup(email: &str) -> NewUser {
        NewUser {
            name: "Asha Rao".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            phone: "9876543210".to_string(),
            address: String::new(),
            city: "Bengaluru".to_string(),
            pincode: String::new(),
        }
    }

    #[tokio::test]
    async fn registration_assigns_customer_role_and_fresh_id() {
        let state = state();
        let user = register(&state, signup("a@x.com")).await.unwrap();

        assert_eq!(user.role, Role::Customer);
        assert_ne!(user.id, Uuid::nil());

        let records = state
            .store
            .find_by(collections::USERS, "email", "a@x.com")
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["role"], "CUSTOMER");
        assert_eq!(records[0]["password"], "secret");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let state = state();
        register(&state, signup("a@x.com")).await.unwrap();

        match register(&state, signup("a@x.com")).await {
            Err(AppError::Duplicate(_)) => {}
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_requires_both_fields_to_match() {
        let state = state();
        register(&state, signup("a@x.com")).await.unwrap();

        let user = login(&state, "a@x.com", "secret").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(state.current_user().is_some());
        assert!(state.sessions.load().is_some());

        let wrong = login(&state, "a@x.com", "wrong").await;
        assert!(matches!(wrong, Err(AppError::NotFound(_))));

        let unknown = login(&state, "b@x.com", "secret").await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn logout_clears_slot_and_shipment_cache() {
        let state = state();
        register(&state, signup("a@x.com")).await.unwrap();
        login(&state, "a@x.com", "secret").await.unwrap();

        state.shipments.insert(
            "TRK1".to_string(),
            crate::adapter::shipment::shipment_to_view(
                &serde_json::json!({ "tracking_number": "TRK1" }),
            )
            .unwrap(),
        );

        logout(&state);

        assert!(state.current_user().is_none());
        assert!(state.sessions.load().is_none());
        assert!(state.shipments.is_empty());
    }

    #[tokio::test]
    async fn populated_slot_restores_session_on_startup() {
        let sessions = Arc::new(MemorySessionStore::new());
        let first = AppState::new(Arc::new(MemoryStore::new()), sessions.clone(), 16);

        register(&first, signup("a@x.com")).await.unwrap();
        login(&first, "a@x.com", "secret").await.unwrap();

        // New process, same slot.
        let second = AppState::new(Arc::new(MemoryStore::new()), sessions, 16);
        restore_session(&second);

        assert_eq!(second.current_user().unwrap().email, "a@x.com");
    }
}
