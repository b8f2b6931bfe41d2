mod common;

use assert_matches::assert_matches;
use common::TestApp;
use movie_rental_api::errors::ServiceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn active_cart_is_created_lazily_and_reused() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;

    let first = app.cart.get_active_cart("alice").await.unwrap();
    let second = app.cart.get_active_cart("alice").await.unwrap();

    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn unknown_user_cannot_get_a_cart() {
    let app = TestApp::new().await;

    let err = app.cart.get_active_cart("nobody").await.unwrap_err();
    assert_matches!(err, ServiceError::UserNotFound(name) if name == "nobody");
}

#[tokio::test]
async fn concurrent_first_access_yields_one_cart() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;

    let (a, b) = tokio::join!(
        app.cart.get_active_cart("alice"),
        app.cart.get_active_cart("alice"),
    );

    assert_eq!(a.unwrap().id, b.unwrap().id);
}

#[tokio::test]
async fn adding_a_movie_twice_is_an_error_and_keeps_one_copy() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let movie = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;

    let cart = app.cart.add_movie("alice", movie.id).await.unwrap();
    let err = app.cart.add_movie("alice", movie.id).await.unwrap_err();

    assert_matches!(
        err,
        ServiceError::MovieAlreadyInCart { movie_id, ref username }
            if movie_id == movie.id && username == "alice"
    );
    let movies = app.cart.list_movies(cart.id).await.unwrap();
    assert_eq!(movies.len(), 1);
}

#[tokio::test]
async fn adding_an_unknown_movie_fails() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;

    let err = app.cart.add_movie("alice", 42).await.unwrap_err();
    assert_matches!(err, ServiceError::MovieNotFound(42));
}

#[tokio::test]
async fn removing_an_unknown_movie_fails() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;

    let err = app.cart.remove_movie("alice", 42).await.unwrap_err();
    assert_matches!(err, ServiceError::MovieNotFound(42));
}

#[tokio::test]
async fn removing_a_movie_not_in_the_cart_is_a_no_op() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let in_cart = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;
    let absent = app.seed_movie("Vertigo", dec!(7.50), genre.id).await;

    app.cart.add_movie("alice", in_cart.id).await.unwrap();
    let cart = app.cart.remove_movie("alice", absent.id).await.unwrap();

    let movies = app.cart.list_movies(cart.id).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, in_cart.id);
}

#[tokio::test]
async fn removing_a_movie_takes_it_out_of_the_cart() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let movie = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;

    app.cart.add_movie("alice", movie.id).await.unwrap();
    let cart = app.cart.remove_movie("alice", movie.id).await.unwrap();

    assert!(app.cart.list_movies(cart.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_preserves_insertion_order() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let second = app.seed_movie("Vertigo", dec!(7.50), genre.id).await;
    let first = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;

    app.cart.add_movie("alice", first.id).await.unwrap();
    let cart = app.cart.add_movie("alice", second.id).await.unwrap();

    let names: Vec<_> = app
        .cart
        .list_movies(cart.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Casablanca", "Vertigo"]);
}

#[tokio::test]
async fn listing_an_unknown_cart_fails() {
    let app = TestApp::new().await;

    let err = app.cart.list_movies(999).await.unwrap_err();
    assert_matches!(err, ServiceError::ShoppingCartNotFound(999));
}

#[tokio::test]
async fn total_sums_current_prices() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let a = app.seed_movie("Casablanca", dec!(10.00), genre.id).await;
    let b = app.seed_movie("Vertigo", dec!(15.00), genre.id).await;

    app.cart.add_movie("alice", a.id).await.unwrap();
    let cart = app.cart.add_movie("alice", b.id).await.unwrap();

    assert_eq!(app.cart.total_price(cart.id).await.unwrap(), dec!(25.00));
}

#[tokio::test]
async fn empty_cart_totals_zero() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;

    let cart = app.cart.get_active_cart("alice").await.unwrap();
    assert_eq!(app.cart.total_price(cart.id).await.unwrap(), Decimal::ZERO);
}

#[tokio::test]
async fn disposal_starts_a_fresh_cart() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let movie = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;

    let old = app.cart.add_movie("alice", movie.id).await.unwrap();
    app.cart.dispose_active_cart("alice").await.unwrap();

    let fresh = app.cart.get_active_cart("alice").await.unwrap();
    assert_ne!(old.id, fresh.id);
    assert!(app.cart.list_movies(fresh.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn disposal_for_an_unknown_user_fails() {
    let app = TestApp::new().await;

    let err = app.cart.dispose_active_cart("nobody").await.unwrap_err();
    assert_matches!(err, ServiceError::UserNotFound(_));
}
