//! # Order Events
//!
//! After a simulation succeeds, its result is handed to a messaging collaborator as an
//! [`OrderEvent`]. Delivery is best effort and at most once:
//!
//! - [`OrderEventPublisher::publish`] spawns the send and returns immediately. The HTTP
//!   handler never waits on it, so the response is the same whether or not delivery works.
//! - A serialization or send failure is logged at `warn` and dropped. There is no retry,
//!   no dead-letter queue and no acknowledgment tracking.
//!
//! The default sink is an in-process channel drained by [`OrderEventListener`], which logs
//! every event it receives. With the `kafka` feature the `kafka` module adds a broker
//! backed sink.

use crate::model::{OrderEvent, SimulatedOrder};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDestination {
    pub exchange: String,
    pub routing_key: String,
}

impl EventDestination {
    pub fn new(exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
        }
    }
}

impl fmt::Display for EventDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.exchange, self.routing_key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to serialize order: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to send to {destination}: {reason}")]
    Send {
        destination: String,
        reason: String,
    },
}

/// Messaging collaborator.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(
        &self,
        destination: &EventDestination,
        event: OrderEvent,
    ) -> Result<(), PublishError>;
}

/// An event as it arrives at the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredEvent {
    pub destination: EventDestination,
    pub event: OrderEvent,
}

/// Sink backed by a bounded tokio channel.
#[derive(Clone)]
pub struct ChannelEventSink {
    sender: mpsc::Sender<DeliveredEvent>,
}

impl ChannelEventSink {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<DeliveredEvent>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn send(
        &self,
        destination: &EventDestination,
        event: OrderEvent,
    ) -> Result<(), PublishError> {
        self.sender
            .send(DeliveredEvent {
                destination: destination.clone(),
                event,
            })
            .await
            .map_err(|_| PublishError::Send {
                destination: destination.to_string(),
                reason: "listener is gone".to_string(),
            })
    }
}

/// Consumes delivered events and logs them.
pub struct OrderEventListener;

impl OrderEventListener {
    /// Runs until every sender is dropped; resolves to the number of events seen.
    pub fn spawn(mut receiver: mpsc::Receiver<DeliveredEvent>) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut received = 0;
            while let Some(delivered) = receiver.recv().await {
                received += 1;
                info!(
                    destination = %delivered.destination,
                    published_at = %delivered.event.published_at,
                    order = %delivered.event.serialized_order,
                    "Order event received"
                );
            }
            debug!(received, "Event listener stopped");
            received
        })
    }
}

#[derive(Clone)]
pub struct OrderEventPublisher {
    sink: Arc<dyn EventSink>,
    destination: EventDestination,
}

impl OrderEventPublisher {
    pub fn new(sink: Arc<dyn EventSink>, destination: EventDestination) -> Self {
        Self { sink, destination }
    }

    /// Fire and forget. The handle only exists so callers may wait for the attempt.
    pub fn publish(&self, order: &SimulatedOrder) -> JoinHandle<()> {
        let sink = self.sink.clone();
        let destination = self.destination.clone();
        let order = order.clone();

        tokio::spawn(async move {
            let result = match OrderEvent::from_order(&order) {
                Ok(event) => sink.send(&destination, event).await,
                Err(e) => Err(PublishError::from(e)),
            };
            match result {
                Ok(()) => debug!(%destination, "Order event published"),
                Err(e) => warn!(%destination, error = %e, "Order event dropped"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Money, OrderItem, ProductId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSink {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl EventSink for FailingSink {
        async fn send(
            &self,
            destination: &EventDestination,
            _event: OrderEvent,
        ) -> Result<(), PublishError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(PublishError::Send {
                destination: destination.to_string(),
                reason: "broker down".to_string(),
            })
        }
    }

    fn order() -> SimulatedOrder {
        SimulatedOrder {
            items: vec![OrderItem::new(ProductId(1), Money::from_minor_units(500_000))],
            total_amount: Money::from_minor_units(500_000),
            products_not_found: vec![ProductId(99)],
        }
    }

    fn destination() -> EventDestination {
        EventDestination::new("order.events", "order.created")
    }

    #[tokio::test]
    async fn test_publish_delivers_serialized_order() {
        let (sink, mut receiver) = ChannelEventSink::new(8);
        let publisher = OrderEventPublisher::new(Arc::new(sink), destination());

        publisher.publish(&order()).await.unwrap();

        let delivered = receiver.recv().await.unwrap();
        assert_eq!(delivered.destination, destination());
        assert_eq!(
            delivered.event.serialized_order,
            serde_json::to_string(&order()).unwrap()
        );
        assert!(receiver.try_recv().is_err(), "Exactly one event per publish");
    }

    #[tokio::test]
    async fn test_failed_send_is_attempted_once_and_swallowed() {
        let sink = Arc::new(FailingSink {
            attempts: AtomicUsize::new(0),
        });
        let publisher = OrderEventPublisher::new(sink.clone(), destination());

        // The task completes normally; the failure never escapes
        publisher.publish(&order()).await.unwrap();
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_listener_counts_until_closed() {
        let (sink, receiver) = ChannelEventSink::new(8);
        let listener = OrderEventListener::spawn(receiver);
        let publisher = OrderEventPublisher::new(Arc::new(sink), destination());

        publisher.publish(&order()).await.unwrap();
        publisher.publish(&SimulatedOrder::default()).await.unwrap();
        drop(publisher);

        assert_eq!(listener.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_send_after_listener_gone_fails() {
        let (sink, receiver) = ChannelEventSink::new(1);
        drop(receiver);

        let event = OrderEvent::from_order(&order()).unwrap();
        let result = sink.send(&destination(), event).await;
        assert!(matches!(result, Err(PublishError::Send { .. })));
    }
}
