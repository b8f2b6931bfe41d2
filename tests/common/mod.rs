#![allow(dead_code)]

use chrono::Utc;
use movie_rental_api::{
    db,
    entities::{movie, movie_genre, user, IdentityProvider, UserRole},
    events::{self, EventSender},
    services::{ShoppingCartService, UserService},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A fully migrated in-memory database with the service layer wired up.
///
/// The pool is pinned to a single connection so every service call sees the
/// same in-memory database.
pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub event_sender: Arc<EventSender>,
    pub cart: Arc<ShoppingCartService>,
    pub users: UserService,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.expect("sqlite connection");
        db::run_migrations(&db).await.expect("migrations");
        let db = Arc::new(db);

        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(events::process_events(rx));
        let event_sender = Arc::new(EventSender::new(tx));

        let cart = Arc::new(ShoppingCartService::new(db.clone(), event_sender.clone()));
        let users = UserService::new(db.clone(), event_sender.clone());

        Self {
            db,
            event_sender,
            cart,
            users,
        }
    }

    pub async fn seed_user(&self, username: &str) -> user::Model {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set(None),
            role: Set(UserRole::User),
            provider: Set(IdentityProvider::Local),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("seed user")
    }

    pub async fn seed_genre(&self, name: &str) -> movie_genre::Model {
        movie_genre::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("seed genre")
    }

    pub async fn seed_movie(&self, name: &str, price: Decimal, genre_id: i64) -> movie::Model {
        movie::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(price),
            image_url: Set(None),
            genre_id: Set(genre_id),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("seed movie")
    }
}
