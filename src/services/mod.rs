pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod users;

pub use cart::ShoppingCartService;
pub use catalog::CatalogService;
pub use checkout::CheckoutService;
pub use users::UserService;
