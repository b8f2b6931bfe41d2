pub mod principal;

pub use principal::{Principal, PROVIDER_FEDERATED, PROVIDER_LOCAL};

use crate::{
    entities::{user, IdentityProvider, User, UserModel},
    errors::ServiceError,
    AppState,
};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Bearer token claims. `provider` tags which principal variant the subject
/// resolves to; the cart layer never sees this field directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username
    pub sub: String,
    /// Principal kind: "local" or "federated"
    pub provider: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_ttl: Duration) -> Self {
        Self {
            jwt_secret,
            token_ttl,
        }
    }
}

/// Credential verification and token issue/validation.
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Verifies local credentials and returns the user with a bearer token.
    ///
    /// Empty username or password fails with `InvalidCredentials` before any
    /// lookup; an unknown username and a wrong password are indistinguishable
    /// to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserModel, String), ServiceError> {
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidCredentials);
        }

        let user = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(ServiceError::InvalidCredentials)?;
        verify_password(password, hash)?;

        let provider = match user.provider {
            IdentityProvider::Local => PROVIDER_LOCAL,
            IdentityProvider::Federated => PROVIDER_FEDERATED,
        };
        let token = self.issue_token(&user.username, provider)?;
        Ok((user, token))
    }

    /// Issues a signed bearer token carrying the provider tag.
    pub fn issue_token(&self, username: &str, provider: &str) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            provider: provider.to_string(),
            iat: now,
            exp: now + self.config.token_ttl.as_secs() as i64,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token encoding failed: {e}")))
    }

    /// Decodes and validates a bearer token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {e}")))
    }
}

/// Hashes a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("password hashing failed: {e}")))
}

/// Verifies a password against a stored argon2 hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), ServiceError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ServiceError::InternalError(format!("corrupt password hash: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ServiceError::InvalidCredentials)
}

/// The authenticated principal, extracted from the `Authorization` header.
///
/// Dispatches on the runtime variant carried in the token's provider claim;
/// handlers receive a [`Principal`] and only ever call `owner_username()`.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("missing authorization header".into()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServiceError::Unauthorized("expected bearer token".into()))?
            .trim();

        let claims = state.services.auth.validate_token(token)?;
        let principal = Principal::from_provider(&claims.provider, claims.sub)?;
        Ok(Self(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_round_trip_preserves_provider() {
        let config = AuthConfig::new(
            "a_test_secret_that_is_long_enough_for_hs256".into(),
            Duration::from_secs(3600),
        );
        let service = AuthService {
            config,
            db: Arc::new(DatabaseConnection::default()),
        };

        let token = service.issue_token("alice", PROVIDER_LOCAL).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.provider, PROVIDER_LOCAL);
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let config = AuthConfig::new(
            "a_test_secret_that_is_long_enough_for_hs256".into(),
            Duration::from_secs(3600),
        );
        let service = AuthService {
            config,
            db: Arc::new(DatabaseConnection::default()),
        };

        assert!(matches!(
            service.validate_token("not-a-token"),
            Err(ServiceError::Unauthorized(_))
        ));
    }
}
