pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod payments;
pub mod services;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use config::AppConfig;
pub use handlers::AppServices;

/// Shared application state threaded through every handler.
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub event_sender: Arc<events::EventSender>,
    pub services: AppServices,
}

async fn health_check() -> &'static str {
    "OK"
}

/// Builds the full application router over the given state.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", handlers::api_router())
        .with_state(state)
}
