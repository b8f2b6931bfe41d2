mod common;

use assert_matches::assert_matches;
use common::TestApp;
use movie_rental_api::{
    auth::{AuthConfig, AuthService, Principal, PROVIDER_LOCAL},
    entities::IdentityProvider,
    errors::ServiceError,
    services::users::RegisterInput,
};
use std::time::Duration;

fn auth_service(app: &TestApp) -> AuthService {
    AuthService::new(
        AuthConfig::new(
            "an_integration_test_secret_well_over_32_chars".to_string(),
            Duration::from_secs(3600),
        ),
        app.db.clone(),
    )
}

fn register_input(username: &str, password: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        repeat_password: password.to_string(),
    }
}

#[tokio::test]
async fn registered_user_can_log_in() {
    let app = TestApp::new().await;
    let auth = auth_service(&app);

    app.users
        .register(register_input("alice", "s3cret-password"))
        .await
        .unwrap();

    let (user, token) = auth.login("alice", "s3cret-password").await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.provider, IdentityProvider::Local);

    let claims = auth.validate_token(&token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.provider, PROVIDER_LOCAL);
    assert_matches!(
        Principal::from_provider(&claims.provider, claims.sub).unwrap(),
        Principal::Local { username } if username == "alice"
    );
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::new().await;
    let auth = auth_service(&app);

    app.users
        .register(register_input("alice", "s3cret-password"))
        .await
        .unwrap();

    let err = auth.login("alice", "not-the-password").await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidCredentials);
}

#[tokio::test]
async fn unknown_user_and_empty_credentials_are_rejected_alike() {
    let app = TestApp::new().await;
    let auth = auth_service(&app);

    assert_matches!(
        auth.login("ghost", "whatever").await.unwrap_err(),
        ServiceError::InvalidCredentials
    );
    assert_matches!(
        auth.login("", "").await.unwrap_err(),
        ServiceError::InvalidCredentials
    );
}

#[tokio::test]
async fn mismatched_passwords_fail_registration() {
    let app = TestApp::new().await;

    let input = RegisterInput {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "one".to_string(),
        repeat_password: "two".to_string(),
    };
    let err = app.users.register(input).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn taken_username_fails_registration() {
    let app = TestApp::new().await;

    app.users
        .register(register_input("alice", "s3cret-password"))
        .await
        .unwrap();
    let err = app
        .users
        .register(register_input("alice", "another-password"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn federated_provisioning_is_idempotent() {
    let app = TestApp::new().await;

    let first = app
        .users
        .ensure_federated_user("Bob Smith", "bob@idp.example.com")
        .await
        .unwrap();
    let second = app
        .users
        .ensure_federated_user("Bob Smith", "bob@idp.example.com")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.provider, IdentityProvider::Federated);
    assert!(first.password_hash.is_none());
}

#[tokio::test]
async fn federated_user_cannot_log_in_with_a_password() {
    let app = TestApp::new().await;
    let auth = auth_service(&app);

    app.users
        .ensure_federated_user("Bob Smith", "bob@idp.example.com")
        .await
        .unwrap();

    let err = auth.login("Bob Smith", "anything").await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidCredentials);
}
