use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Events emitted by the services as side effects of domain operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    UserRegistered { username: String },
    CartCreated(i64),
    MovieAddedToCart { cart_id: i64, movie_id: i64 },
    MovieRemovedFromCart { cart_id: i64, movie_id: i64 },
    CartDisposed(i64),
    CheckoutCompleted { payment_id: String, amount_minor: i64 },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    /// Event delivery is best-effort and never blocks a domain operation.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event).await {
            error!("Event delivery failed: {}", err);
        }
    }
}

/// Background consumer for the event channel.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "processing event");
    }
    info!("Event channel closed; event processor exiting");
}
