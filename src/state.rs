use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::identity::session::SessionStore;
use crate::models::network::{
    Branch, Notification, NotificationScope, StaffMember, Transaction, Vehicle,
};
use crate::models::shipment::Shipment;
use crate::models::user::{Role, User};
use crate::observability::metrics::Metrics;
use crate::store::RecordStore;

/// Tracking numbers are a fixed alphabetic prefix plus a monotonic
/// numeric suffix; the record store rejects collisions.
const TRACKING_PREFIX: &str = "TRK";
const TRACKING_SEQ_START: u64 = 100_000;

/// Single in-memory source of truth for the portal screens. Every map is
/// a projection of confirmed store state: managers write to the store
/// first and apply here only after the store call succeeds.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub shipments: DashMap<String, Shipment>,
    pub branches: DashMap<Uuid, Branch>,
    pub vehicles: DashMap<String, Vehicle>,
    pub staff: DashMap<Uuid, StaffMember>,
    pub transactions: DashMap<Uuid, Transaction>,
    notifications: RwLock<Vec<Notification>>,
    current_user: RwLock<Option<User>>,
    pub notification_events_tx: broadcast::Sender<Notification>,
    tracking_seq: AtomicU64,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        sessions: Arc<dyn SessionStore>,
        event_buffer_size: usize,
    ) -> Self {
        let (notification_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            store,
            sessions,
            shipments: DashMap::new(),
            branches: DashMap::new(),
            vehicles: DashMap::new(),
            staff: DashMap::new(),
            transactions: DashMap::new(),
            notifications: RwLock::new(Vec::new()),
            current_user: RwLock::new(None),
            notification_events_tx,
            tracking_seq: AtomicU64::new(TRACKING_SEQ_START),
            metrics: Metrics::new(),
        }
    }

    pub fn next_tracking_number(&self) -> String {
        let suffix = self.tracking_seq.fetch_add(1, Ordering::Relaxed);
        format!("{TRACKING_PREFIX}{suffix}")
    }

    /// Appends a role-scoped notification and pushes it to live
    /// WebSocket subscribers.
    pub fn add_notification(&self, message: impl Into<String>, scope: NotificationScope) {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            scope,
            created_at: Utc::now(),
        };

        self.notifications
            .write()
            .expect("notification log poisoned")
            .push(notification.clone());

        let _ = self.notification_events_tx.send(notification);
    }

    /// Notifications visible to `role` (its own scope plus `All`), most
    /// recent first.
    pub fn notifications_for_role(&self, role: Role) -> Vec<Notification> {
        self.notifications
            .read()
            .expect("notification log poisoned")
            .iter()
            .rev()
            .filter(|n| n.scope.visible_to(role))
            .cloned()
            .collect()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications
            .read()
            .expect("notification log poisoned")
            .len()
    }

    pub fn set_current_user(&self, user: Option<User>) {
        let mut slot = self.current_user.write().expect("session state poisoned");
        self.metrics
            .active_sessions
            .set(user.is_some() as i64);
        *slot = user;
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user
            .read()
            .expect("session state poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::AppState;
    use crate::identity::session::MemorySessionStore;
    use crate::models::network::NotificationScope;
    use crate::models::user::Role;
    use crate::store::memory::MemoryStore;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemorySessionStore::new()),
            16,
        )
    }

    #[test]
    fn tracking_numbers_are_prefixed_and_monotonic() {
        let state = state();
        let first = state.next_tracking_number();
        let second = state.next_tracking_number();

        assert!(first.starts_with("TRK"));
        assert_ne!(first, second);
        let a: u64 = first.trim_start_matches("TRK").parse().unwrap();
        let b: u64 = second.trim_start_matches("TRK").parse().unwrap();
        assert_eq!(b, a + 1);
    }

    #[test]
    fn notifications_filter_by_role_most_recent_first() {
        let state = state();
        state.add_notification("for customers", NotificationScope::Customer);
        state.add_notification("for agents", NotificationScope::Agent);
        state.add_notification("for everyone", NotificationScope::All);

        let agent_view = state.notifications_for_role(Role::Agent);
        assert_eq!(agent_view.len(), 2);
        assert_eq!(agent_view[0].message, "for everyone");
        assert_eq!(agent_view[1].message, "for agents");

        let customer_view = state.notifications_for_role(Role::Customer);
        assert_eq!(customer_view.len(), 2);
        assert_eq!(customer_view[0].message, "for everyone");
        assert_eq!(customer_view[1].message, "for customers");
    }
}
