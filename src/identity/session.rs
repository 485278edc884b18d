use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::error::AppError;
use crate::models::user::User;

/// Durable slot holding the logged-in user between process runs. A
/// populated slot restores the session at startup without
/// re-authenticating; logout clears it.
pub trait SessionStore: Send + Sync {
    fn save(&self, user: &User) -> Result<(), AppError>;
    fn load(&self) -> Option<User>;
    fn clear(&self);
}

/// Session slot backed by a JSON file at a fixed path.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, user: &User) -> Result<(), AppError> {
        let raw = serde_json::to_string(user)
            .map_err(|err| AppError::Internal(format!("session serialize failed: {err}")))?;

        fs::write(&self.path, raw)
            .map_err(|err| AppError::Internal(format!("session write failed: {err}")))
    }

    fn load(&self) -> Option<User> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "discarding unreadable session slot");
                None
            }
        }
    }

    fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Volatile slot for tests and embedded use.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<User>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, user: &User) -> Result<(), AppError> {
        *self.slot.write().expect("session slot poisoned") = Some(user.clone());
        Ok(())
    }

    fn load(&self) -> Option<User> {
        self.slot.read().expect("session slot poisoned").clone()
    }

    fn clear(&self) {
        *self.slot.write().expect("session slot poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{FileSessionStore, MemorySessionStore, SessionStore};
    use crate::models::user::{Role, User};

    fn user() -> User {
        User {
            id: Uuid::from_u128(1),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            role: Role::Customer,
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            pincode: String::new(),
            avatar_url: None,
        }
    }

    #[test]
    fn memory_slot_round_trips_and_clears() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());

        store.save(&user()).unwrap();
        assert_eq!(store.load().unwrap().email, "asha@example.com");

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn file_slot_survives_reopen() {
        let path = std::env::temp_dir().join(format!("portal-session-{}.json", Uuid::new_v4()));

        let store = FileSessionStore::new(&path);
        store.save(&user()).unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().unwrap().id, user().id);

        reopened.clear();
        assert!(reopened.load().is_none());
    }

    #[test]
    fn unreadable_file_slot_loads_as_empty() {
        let path = std::env::temp_dir().join(format!("portal-session-{}.json", Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.load().is_none());

        store.clear();
    }
}
