use crate::{
    entities::{
        cart_item, shopping_cart, user, CartItem, CartStatus, Movie, MovieModel, ShoppingCart,
        ShoppingCartModel, User, UserModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    error::SqlErr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Shopping cart service owning the per-user active-cart lifecycle.
///
/// Guarantees:
/// - at most one cart in status `created` per user, also under concurrent
///   first access (unique index on `(user_id, status)` plus insert-then-reread
///   on conflict);
/// - set semantics on movie id within a cart, duplicate adds are hard errors;
/// - totals always read the catalog's current prices, never a cached copy.
#[derive(Clone)]
pub struct ShoppingCartService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ShoppingCartService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Resolves the active cart for a user, creating one lazily if none
    /// exists.
    ///
    /// Idempotent: repeated calls with no intervening disposal return the
    /// same cart. Fails with `UserNotFound` for unknown usernames.
    #[instrument(skip(self))]
    pub async fn get_active_cart(&self, username: &str) -> Result<ShoppingCartModel, ServiceError> {
        self.active_cart_on(&*self.db, username).await
    }

    /// Adds a movie to the user's active cart.
    ///
    /// Fails with `MovieNotFound` for ids unknown to the catalog and with
    /// `MovieAlreadyInCart` when the movie is already present; a duplicate is
    /// a reported error, never a swallowed no-op.
    #[instrument(skip(self))]
    pub async fn add_movie(
        &self,
        username: &str,
        movie_id: i64,
    ) -> Result<ShoppingCartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let cart = self.active_cart_on(&txn, username).await?;
        let movie = Movie::find_by_id(movie_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::MovieNotFound(movie_id))?;

        let existing = CartItem::find()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .filter(cart_item::Column::MovieId.eq(movie.id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::MovieAlreadyInCart {
                movie_id,
                username: username.to_string(),
            });
        }

        let item = cart_item::ActiveModel {
            cart_id: Set(cart.id),
            movie_id: Set(movie.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        item.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::MovieAddedToCart {
                cart_id: cart.id,
                movie_id,
            })
            .await;

        info!("Added movie {} to cart {}", movie_id, cart.id);
        Ok(cart)
    }

    /// Removes a movie from the user's active cart.
    ///
    /// The movie id must exist in the catalog (`MovieNotFound` otherwise),
    /// but removing a movie that is not in the cart is a silent no-op -
    /// deliberately asymmetric with `add_movie`.
    #[instrument(skip(self))]
    pub async fn remove_movie(
        &self,
        username: &str,
        movie_id: i64,
    ) -> Result<ShoppingCartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let cart = self.active_cart_on(&txn, username).await?;
        let movie = Movie::find_by_id(movie_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::MovieNotFound(movie_id))?;

        let result = CartItem::delete_many()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .filter(cart_item::Column::MovieId.eq(movie.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            self.event_sender
                .send_or_log(Event::MovieRemovedFromCart {
                    cart_id: cart.id,
                    movie_id,
                })
                .await;
            info!("Removed movie {} from cart {}", movie_id, cart.id);
        }

        Ok(cart)
    }

    /// Lists the movies in a cart in insertion order.
    ///
    /// Fails with `ShoppingCartNotFound` for unknown cart ids.
    #[instrument(skip(self))]
    pub async fn list_movies(&self, cart_id: i64) -> Result<Vec<MovieModel>, ServiceError> {
        let cart = ShoppingCart::find_by_id(cart_id)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::ShoppingCartNotFound(cart_id))?;

        let items = cart
            .find_related(CartItem)
            .order_by_asc(cart_item::Column::Id)
            .all(&*self.db)
            .await?;

        let movie_ids: Vec<i64> = items.iter().map(|item| item.movie_id).collect();
        let mut movies_by_id: HashMap<i64, MovieModel> = Movie::find()
            .filter(crate::entities::movie::Column::Id.is_in(movie_ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|movie| (movie.id, movie))
            .collect();

        Ok(movie_ids
            .into_iter()
            .filter_map(|id| movies_by_id.remove(&id))
            .collect())
    }

    /// Sums the current catalog price of every movie in the cart.
    ///
    /// Prices are read at call time, so a catalog price change is reflected
    /// immediately. An empty cart totals zero.
    #[instrument(skip(self))]
    pub async fn total_price(&self, cart_id: i64) -> Result<Decimal, ServiceError> {
        let movies = self.list_movies(cart_id).await?;
        Ok(movies.iter().map(|movie| movie.price).sum())
    }

    /// Deletes the user's active cart and its items unconditionally.
    ///
    /// Used both for explicit cancellation and as the first step of checkout;
    /// the storage effect is identical. Propagates `UserNotFound` from the
    /// active-cart lookup.
    #[instrument(skip(self))]
    pub async fn dispose_active_cart(&self, username: &str) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let cart = self.active_cart_on(&txn, username).await?;

        CartItem::delete_many()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await?;
        ShoppingCart::delete_by_id(cart.id).exec(&txn).await?;

        txn.commit().await?;

        self.event_sender.send_or_log(Event::CartDisposed(cart.id)).await;
        info!("Disposed cart {} for user {}", cart.id, username);
        Ok(())
    }

    /// Atomic find-or-create of the `(user, status=created)` cart.
    ///
    /// An insert that loses the race against a concurrent first access hits
    /// the unique index and re-reads the winner, so two distinct `created`
    /// carts for one user can never coexist.
    async fn active_cart_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<ShoppingCartModel, ServiceError> {
        let user = self.find_user(conn, username).await?;

        let existing = Self::find_created_cart(conn, user.id).await?;
        if let Some(cart) = existing {
            return Ok(cart);
        }

        let fresh = shopping_cart::ActiveModel {
            user_id: Set(user.id),
            status: Set(CartStatus::Created),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match fresh.insert(conn).await {
            Ok(cart) => {
                self.event_sender.send_or_log(Event::CartCreated(cart.id)).await;
                info!("Created cart {} for user {}", cart.id, username);
                Ok(cart)
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Self::find_created_cart(conn, user.id)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::InternalError(format!(
                            "active cart for user {username} vanished after insert conflict"
                        ))
                    })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_created_cart<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> Result<Option<ShoppingCartModel>, ServiceError> {
        Ok(ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::Status.eq(CartStatus::Created))
            .one(conn)
            .await?)
    }

    async fn find_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<UserModel, ServiceError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }
}
