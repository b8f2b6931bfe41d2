use crate::{
    auth::AuthenticatedPrincipal,
    errors::ServiceError,
    handlers::common::success_response,
    payments::PaymentDetails,
    AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(checkout))
}

async fn checkout(
    State(state): State<Arc<AppState>>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Json(payload): Json<PaymentDetails>,
) -> Result<impl IntoResponse, ServiceError> {
    let receipt = state
        .services
        .checkout
        .checkout(principal.owner_username(), payload)
        .await?;
    Ok(success_response(receipt))
}
