use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    payments::{ChargeRequest, PaymentDetails, PaymentGateway, Receipt},
    services::cart::ShoppingCartService,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Checkout coordinator: sequences cart disposal and payment capture as one
/// user-facing operation.
///
/// The cart is disposed *before* the charge is attempted, and a failed charge
/// is surfaced only afterwards - the user is left with a fresh, empty cart
/// either way. This ordering is preserved intentionally from the system this
/// one replaces; see DESIGN.md for the recorded risk.
pub struct CheckoutService {
    cart_service: Arc<ShoppingCartService>,
    gateway: Arc<dyn PaymentGateway>,
    event_sender: Arc<EventSender>,
    currency: String,
    description: String,
}

impl CheckoutService {
    pub fn new(
        cart_service: Arc<ShoppingCartService>,
        gateway: Arc<dyn PaymentGateway>,
        event_sender: Arc<EventSender>,
        currency: String,
        description: String,
    ) -> Self {
        Self {
            cart_service,
            gateway,
            event_sender,
            currency,
            description,
        }
    }

    /// Disposes the user's active cart and captures the payment.
    ///
    /// Steps, in order: read the cart total, dispose the cart, charge the
    /// gateway with the configured currency and description. A gateway
    /// failure propagates as `PaymentFailed` after disposal has already
    /// happened; there is no retry and no cart resurrection.
    #[instrument(skip(self, details))]
    pub async fn checkout(
        &self,
        username: &str,
        details: PaymentDetails,
    ) -> Result<Receipt, ServiceError> {
        let cart = self.cart_service.get_active_cart(username).await?;
        let total = self.cart_service.total_price(cart.id).await?;
        let amount_minor = to_minor_units(total)?;

        self.cart_service.dispose_active_cart(username).await?;

        let request = ChargeRequest {
            amount_minor,
            currency: self.currency.clone(),
            description: self.description.clone(),
            source: details.token,
        };

        let receipt = match self.gateway.charge(&request).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!("Charge for user {} failed after cart disposal: {}", username, err);
                return Err(err);
            }
        };

        self.event_sender
            .send_or_log(Event::CheckoutCompleted {
                payment_id: receipt.payment_id.clone(),
                amount_minor,
            })
            .await;

        info!(
            "Checkout completed for user {}: payment {} ({} {})",
            username, receipt.payment_id, amount_minor, self.currency
        );
        Ok(receipt)
    }
}

/// Converts a full-precision total into minor currency units.
///
/// The conversion scales before rounding, so fractional cents arising from
/// catalog prices with more than two decimals round once at the end rather
/// than being truncated out of the sum.
fn to_minor_units(total: Decimal) -> Result<i64, ServiceError> {
    (total * Decimal::ONE_HUNDRED)
        .round_dp(0)
        .to_i64()
        .ok_or_else(|| ServiceError::ValidationError(format!("amount {total} out of range")))
}
