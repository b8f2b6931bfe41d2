pub mod auth;
pub mod cart;
pub mod checkout;
pub mod common;
pub mod movies;

use crate::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    events::EventSender,
    payments::PaymentGateway,
    services::{CatalogService, CheckoutService, ShoppingCartService, UserService},
    AppState,
};
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

/// The wired service layer shared by all handlers.
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<ShoppingCartService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: &AppConfig,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let auth_config = AuthConfig::new(
            config.jwt_secret.clone(),
            Duration::from_secs(config.jwt_expiration),
        );
        let cart = Arc::new(ShoppingCartService::new(db.clone(), event_sender.clone()));
        let checkout = Arc::new(CheckoutService::new(
            cart.clone(),
            gateway,
            event_sender.clone(),
            config.charge_currency.clone(),
            config.charge_description.clone(),
        ));
        Self {
            auth: Arc::new(AuthService::new(auth_config, db.clone())),
            users: Arc::new(UserService::new(db.clone(), event_sender)),
            catalog: Arc::new(CatalogService::new(db)),
            cart,
            checkout,
        }
    }
}

/// Composes the versioned API surface.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/movies", movies::movie_routes())
        .nest("/genres", movies::genre_routes())
        .nest("/actors", movies::actor_routes())
        .nest("/cart", cart::routes())
        .nest("/checkout", checkout::routes())
}
