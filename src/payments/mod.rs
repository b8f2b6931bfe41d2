use crate::errors::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Payment details supplied by the client at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDetails {
    /// Single-use payment token minted by the provider's frontend SDK.
    pub token: String,
}

/// A capture request sent to the payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub description: String,
    pub source: String,
}

/// The successful result of a payment capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub payment_id: String,
    pub status: String,
    pub balance_transaction: Option<String>,
}

/// Boundary to the external payment provider. Provider-specific failures
/// (network, invalid request, card decline, auth) all surface as one opaque
/// `PaymentFailed`; sub-codes are not interpreted beyond the message.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<Receipt, ServiceError>;
}

const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Stripe charge gateway over the form-encoded `/v1/charges` endpoint.
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Self {
        Self::with_api_base(secret_key, STRIPE_API_BASE.to_string())
    }

    /// Points the gateway at a different API base. Used by tests.
    pub fn with_api_base(secret_key: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripeCharge {
    id: String,
    status: String,
    balance_transaction: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, request), fields(amount_minor = request.amount_minor, currency = %request.currency))]
    async fn charge(&self, request: &ChargeRequest) -> Result<Receipt, ServiceError> {
        let params = [
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency.clone()),
            ("description", request.description.clone()),
            ("source", request.source.clone()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/charges", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::PaymentFailed(format!("provider unreachable: {e}")))?;

        if response.status().is_success() {
            let charge: StripeCharge = response
                .json()
                .await
                .map_err(|e| ServiceError::PaymentFailed(format!("malformed response: {e}")))?;
            Ok(Receipt {
                payment_id: charge.id,
                status: charge.status,
                balance_transaction: charge.balance_transaction,
            })
        } else {
            let status = response.status();
            let message = response
                .json::<StripeErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| format!("provider returned {status}"));
            Err(ServiceError::PaymentFailed(message))
        }
    }
}
