mod common;

use assert_matches::assert_matches;
use async_trait::async_trait;
use common::TestApp;
use movie_rental_api::{
    errors::ServiceError,
    payments::{ChargeRequest, PaymentDetails, PaymentGateway, Receipt},
    services::CheckoutService,
};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

/// Gateway double that records every request and answers with a canned
/// result.
struct RecordingGateway {
    requests: Mutex<Vec<ChargeRequest>>,
    outcome: Result<Receipt, String>,
}

impl RecordingGateway {
    fn succeeding() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Ok(Receipt {
                payment_id: "ch_test_1".to_string(),
                status: "succeeded".to_string(),
                balance_transaction: Some("txn_test_1".to_string()),
            }),
        }
    }

    fn declining(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Err(message.to_string()),
        }
    }

    fn requests(&self) -> Vec<ChargeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<Receipt, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome
            .clone()
            .map_err(ServiceError::PaymentFailed)
    }
}

fn checkout_service(app: &TestApp, gateway: Arc<RecordingGateway>) -> CheckoutService {
    CheckoutService::new(
        app.cart.clone(),
        gateway,
        app.event_sender.clone(),
        "eur".to_string(),
        "Movie rental order".to_string(),
    )
}

fn card_token() -> PaymentDetails {
    PaymentDetails {
        token: "tok_visa".to_string(),
    }
}

#[tokio::test]
async fn checkout_charges_the_cart_total_in_minor_units() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let a = app.seed_movie("Casablanca", dec!(10.00), genre.id).await;
    let b = app.seed_movie("Vertigo", dec!(15.00), genre.id).await;
    app.cart.add_movie("alice", a.id).await.unwrap();
    app.cart.add_movie("alice", b.id).await.unwrap();

    let gateway = Arc::new(RecordingGateway::succeeding());
    let checkout = checkout_service(&app, gateway.clone());

    let receipt = checkout.checkout("alice", card_token()).await.unwrap();

    assert_eq!(receipt.payment_id, "ch_test_1");
    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount_minor, 2500);
    assert_eq!(requests[0].currency, "eur");
    assert_eq!(requests[0].source, "tok_visa");
}

#[tokio::test]
async fn checkout_disposes_the_cart_on_success() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let movie = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;
    let old = app.cart.add_movie("alice", movie.id).await.unwrap();

    let checkout = checkout_service(&app, Arc::new(RecordingGateway::succeeding()));
    checkout.checkout("alice", card_token()).await.unwrap();

    let fresh = app.cart.get_active_cart("alice").await.unwrap();
    assert_ne!(old.id, fresh.id);
    assert!(app.cart.list_movies(fresh.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn declined_charge_surfaces_after_the_cart_is_gone() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;
    let genre = app.seed_genre("Drama").await;
    let movie = app.seed_movie("Casablanca", dec!(9.99), genre.id).await;
    let old = app.cart.add_movie("alice", movie.id).await.unwrap();

    let checkout = checkout_service(&app, Arc::new(RecordingGateway::declining("card declined")));
    let err = checkout.checkout("alice", card_token()).await.unwrap_err();

    assert_matches!(err, ServiceError::PaymentFailed(msg) if msg == "card declined");
    // The cart was disposed before the charge attempt and stays gone.
    let fresh = app.cart.get_active_cart("alice").await.unwrap();
    assert_ne!(old.id, fresh.id);
    assert!(app.cart.list_movies(fresh.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_user_never_reaches_the_gateway() {
    let app = TestApp::new().await;

    let gateway = Arc::new(RecordingGateway::succeeding());
    let checkout = checkout_service(&app, gateway.clone());

    let err = checkout.checkout("nobody", card_token()).await.unwrap_err();

    assert_matches!(err, ServiceError::UserNotFound(_));
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn empty_cart_checks_out_with_a_zero_charge() {
    let app = TestApp::new().await;
    app.seed_user("alice").await;

    let gateway = Arc::new(RecordingGateway::succeeding());
    let checkout = checkout_service(&app, gateway.clone());

    checkout.checkout("alice", card_token()).await.unwrap();

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount_minor, 0);
}
