use crate::{
    auth::AuthenticatedPrincipal,
    entities::MovieModel,
    errors::ServiceError,
    handlers::common::{no_content_response, success_response},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(view_cart))
        .route("/", delete(cancel_cart))
        .route("/movies/:id", post(add_movie))
        .route("/movies/:id", delete(remove_movie))
}

/// The active cart as rendered to the client: current items and the total at
/// current catalog prices.
#[derive(Debug, Serialize)]
struct CartView {
    cart_id: i64,
    username: String,
    movies: Vec<MovieModel>,
    total_price: Decimal,
}

async fn view_of(
    state: &AppState,
    username: &str,
) -> Result<CartView, ServiceError> {
    let cart = state.services.cart.get_active_cart(username).await?;
    let movies = state.services.cart.list_movies(cart.id).await?;
    let total_price = state.services.cart.total_price(cart.id).await?;
    Ok(CartView {
        cart_id: cart.id,
        username: username.to_string(),
        movies,
        total_price,
    })
}

async fn view_cart(
    State(state): State<Arc<AppState>>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> Result<impl IntoResponse, ServiceError> {
    let view = view_of(&state, principal.owner_username()).await?;
    Ok(success_response(view))
}

async fn add_movie(
    State(state): State<Arc<AppState>>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let username = principal.owner_username();
    state.services.cart.add_movie(username, movie_id).await?;
    let view = view_of(&state, username).await?;
    Ok(success_response(view))
}

async fn remove_movie(
    State(state): State<Arc<AppState>>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let username = principal.owner_username();
    state.services.cart.remove_movie(username, movie_id).await?;
    let view = view_of(&state, username).await?;
    Ok(success_response(view))
}

async fn cancel_cart(
    State(state): State<Arc<AppState>>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .cart
        .dispose_active_cart(principal.owner_username())
        .await?;
    Ok(no_content_response())
}
