use crate::{
    auth::hash_password,
    entities::{user, IdentityProvider, User, UserModel, UserRole},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// User registration and lookup for both identity origins.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

/// Input for local registration
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Registers a local-credential user.
    ///
    /// Empty username or password fails with `InvalidCredentials`, mismatched
    /// passwords with a validation error, and a taken username with a
    /// conflict. The password is stored as an argon2 hash.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserModel, ServiceError> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(ServiceError::InvalidCredentials);
        }
        if input.password != input.repeat_password {
            return Err(ServiceError::ValidationError(
                "passwords do not match".to_string(),
            ));
        }
        if self.find_by_username(&input.username).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "username {} is already taken",
                input.username
            )));
        }

        let password_hash = hash_password(&input.password)?;
        let user = user::ActiveModel {
            username: Set(input.username.clone()),
            email: Set(input.email),
            password_hash: Set(Some(password_hash)),
            role: Set(UserRole::User),
            provider: Set(IdentityProvider::Local),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let user = user.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::UserRegistered {
                username: user.username.clone(),
            })
            .await;

        info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Provisions a federated user on first login; subsequent logins return
    /// the existing record untouched.
    #[instrument(skip(self))]
    pub async fn ensure_federated_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UserModel, ServiceError> {
        if let Some(existing) = self.find_by_username(username).await? {
            return Ok(existing);
        }

        let user = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(None),
            role: Set(UserRole::User),
            provider: Set(IdentityProvider::Federated),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let user = user.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::UserRegistered {
                username: user.username.clone(),
            })
            .await;

        info!("Provisioned federated user {}", user.username);
        Ok(user)
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserModel>, ServiceError> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?)
    }

    /// Like `find_by_username` but absence is an error.
    pub async fn get_by_username(&self, username: &str) -> Result<UserModel, ServiceError> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }
}
