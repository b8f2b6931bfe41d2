pub mod actor;
pub mod cart_item;
pub mod movie;
pub mod movie_actor;
pub mod movie_genre;
pub mod shopping_cart;
pub mod user;

// Re-export entities
pub use actor::{Entity as Actor, Model as ActorModel};
pub use cart_item::{Entity as CartItem, Model as CartItemModel};
pub use movie::{Entity as Movie, Model as MovieModel};
pub use movie_actor::{Entity as MovieActor, Model as MovieActorModel};
pub use movie_genre::{Entity as MovieGenre, Model as MovieGenreModel};
pub use shopping_cart::{CartStatus, Entity as ShoppingCart, Model as ShoppingCartModel};
pub use user::{Entity as User, IdentityProvider, Model as UserModel, UserRole};
