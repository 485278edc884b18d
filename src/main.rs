mod adapter;
mod api;
mod config;
mod error;
mod identity;
mod lifecycle;
mod models;
mod observability;
mod rates;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::adapter::user::user_to_record;
use crate::identity::session::FileSessionStore;
use crate::models::user::{Role, User};
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::{collections, RecordStore};

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let record_store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let sessions = Arc::new(FileSessionStore::new(&config.session_file));

    seed_staff_accounts(record_store.as_ref()).await?;

    let app_state = Arc::new(AppState::new(
        record_store,
        sessions,
        config.event_buffer_size,
    ));

    identity::restore_session(&app_state);

    let app = api::rest::router(app_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "portal started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

/// Agent and admin accounts are never created through registration; an
/// empty store gets one of each so the portal is usable out of the box.
async fn seed_staff_accounts(store: &dyn RecordStore) -> Result<(), error::AppError> {
    if !store.list(collections::USERS).await?.is_empty() {
        return Ok(());
    }

    for (name, email, role) in [
        ("Branch Agent", "agent@portal.local", Role::Agent),
        ("Network Admin", "admin@portal.local", Role::Admin),
    ] {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            pincode: String::new(),
            avatar_url: None,
        };

        let mut record = user_to_record(&user);
        if let Some(fields) = record.as_object_mut() {
            fields.insert("password".to_string(), "changeme".into());
        }
        store.create(collections::USERS, record).await?;

        tracing::info!(email, role = role.record_token(), "seeded staff account");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
