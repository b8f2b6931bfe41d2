use crate::{
    auth::PROVIDER_FEDERATED,
    entities::UserModel,
    errors::ServiceError,
    handlers::common::{created_response, success_response},
    services::users::RegisterInput,
    AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/federated-login", post(federated_login))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Profile asserted by the federated identity provider after its own
/// authentication flow; the provider dance itself happens at the edge.
#[derive(Debug, Deserialize)]
struct FederatedLoginRequest {
    display_name: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
    user: UserModel,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.register(payload).await?;
    Ok(created_response(user))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (user, token) = state
        .services
        .auth
        .login(&payload.username, &payload.password)
        .await?;
    Ok(success_response(TokenResponse { token, user }))
}

async fn federated_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FederatedLoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state
        .services
        .users
        .ensure_federated_user(&payload.display_name, &payload.email)
        .await?;
    let token = state
        .services
        .auth
        .issue_token(&user.username, PROVIDER_FEDERATED)?;
    Ok(success_response(TokenResponse { token, user }))
}
