use crate::{
    errors::ServiceError,
    handlers::common::{created_response, no_content_response, success_response},
    services::catalog::MovieInput,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_movies))
        .route("/", post(create_movie))
        .route("/:id", get(get_movie))
        .route("/:id", put(update_movie))
        .route("/:id", delete(delete_movie))
        .route("/:id/actors", get(movie_actors))
}

pub fn genre_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_genres))
        .route("/:id", get(get_genre))
}

pub fn actor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_actors))
        .route("/:id", get(get_actor))
}

async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let movies = state.services.catalog.list_movies().await?;
    Ok(success_response(movies))
}

async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state.services.catalog.get_movie(id).await?;
    Ok(success_response(movie))
}

async fn movie_actors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let actors = state.services.catalog.movie_actors(id).await?;
    Ok(success_response(actors))
}

async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MovieInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state.services.catalog.create_movie(payload).await?;
    Ok(created_response(movie))
}

async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<MovieInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state.services.catalog.update_movie(id, payload).await?;
    Ok(success_response(movie))
}

async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.catalog.delete_movie(id).await?;
    Ok(no_content_response())
}

async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(success_response(genres))
}

async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(success_response(genre))
}

async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let actors = state.services.catalog.list_actors().await?;
    Ok(success_response(actors))
}

async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = state.services.catalog.get_actor(id).await?;
    Ok(success_response(actor))
}
