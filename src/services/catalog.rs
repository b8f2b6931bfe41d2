use crate::{
    entities::{
        movie, movie_actor, Actor, ActorModel, Movie, MovieActor, MovieGenre, MovieGenreModel,
        MovieModel,
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Catalog store: movies, genres, and actors with their referential lookups.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

/// Input for creating or replacing a movie
#[derive(Debug, Deserialize)]
pub struct MovieInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub genre_id: i64,
    #[serde(default)]
    pub actor_ids: Vec<i64>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list_movies(&self) -> Result<Vec<MovieModel>, ServiceError> {
        Ok(Movie::find()
            .order_by_asc(movie::Column::Id)
            .all(&*self.db)
            .await?)
    }

    pub async fn get_movie(&self, movie_id: i64) -> Result<MovieModel, ServiceError> {
        Movie::find_by_id(movie_id)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::MovieNotFound(movie_id))
    }

    /// The actors credited on a movie.
    pub async fn movie_actors(&self, movie_id: i64) -> Result<Vec<ActorModel>, ServiceError> {
        let movie = self.get_movie(movie_id).await?;
        Ok(movie.find_related(Actor).all(&*self.db).await?)
    }

    /// Creates a movie after validating its genre and actor references.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_movie(&self, input: MovieInput) -> Result<MovieModel, ServiceError> {
        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        Self::require_genre(&txn, input.genre_id).await?;
        Self::require_actors(&txn, &input.actor_ids).await?;

        let movie = movie::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            image_url: Set(input.image_url),
            genre_id: Set(input.genre_id),
            ..Default::default()
        };
        let movie = movie.insert(&txn).await?;

        for actor_id in &input.actor_ids {
            movie_actor::ActiveModel {
                movie_id: Set(movie.id),
                actor_id: Set(*actor_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!("Created movie {} ({})", movie.id, movie.name);
        Ok(movie)
    }

    /// Replaces a movie's attributes and actor set.
    #[instrument(skip(self, input))]
    pub async fn update_movie(
        &self,
        movie_id: i64,
        input: MovieInput,
    ) -> Result<MovieModel, ServiceError> {
        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let movie = Movie::find_by_id(movie_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::MovieNotFound(movie_id))?;
        Self::require_genre(&txn, input.genre_id).await?;
        Self::require_actors(&txn, &input.actor_ids).await?;

        let mut active: movie::ActiveModel = movie.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.image_url = Set(input.image_url);
        active.genre_id = Set(input.genre_id);
        let movie = active.update(&txn).await?;

        MovieActor::delete_many()
            .filter(movie_actor::Column::MovieId.eq(movie_id))
            .exec(&txn)
            .await?;
        for actor_id in &input.actor_ids {
            movie_actor::ActiveModel {
                movie_id: Set(movie.id),
                actor_id: Set(*actor_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(movie)
    }

    /// Deletes a movie; join rows and cart references go with it.
    #[instrument(skip(self))]
    pub async fn delete_movie(&self, movie_id: i64) -> Result<(), ServiceError> {
        let result = Movie::delete_by_id(movie_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::MovieNotFound(movie_id));
        }
        info!("Deleted movie {}", movie_id);
        Ok(())
    }

    pub async fn list_genres(&self) -> Result<Vec<MovieGenreModel>, ServiceError> {
        Ok(MovieGenre::find().all(&*self.db).await?)
    }

    pub async fn get_genre(&self, genre_id: i64) -> Result<MovieGenreModel, ServiceError> {
        MovieGenre::find_by_id(genre_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Genre with id: {genre_id} was not found")))
    }

    pub async fn list_actors(&self) -> Result<Vec<ActorModel>, ServiceError> {
        Ok(Actor::find().all(&*self.db).await?)
    }

    pub async fn get_actor(&self, actor_id: i64) -> Result<ActorModel, ServiceError> {
        Actor::find_by_id(actor_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Actor with id: {actor_id} was not found")))
    }

    async fn require_genre<C: sea_orm::ConnectionTrait>(
        conn: &C,
        genre_id: i64,
    ) -> Result<(), ServiceError> {
        MovieGenre::find_by_id(genre_id)
            .one(conn)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Genre with id: {genre_id} was not found")))
    }

    async fn require_actors<C: sea_orm::ConnectionTrait>(
        conn: &C,
        actor_ids: &[i64],
    ) -> Result<(), ServiceError> {
        for actor_id in actor_ids {
            Actor::find_by_id(*actor_id)
                .one(conn)
                .await?
                .map(|_| ())
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Actor with id: {actor_id} was not found"))
                })?;
        }
        Ok(())
    }
}
