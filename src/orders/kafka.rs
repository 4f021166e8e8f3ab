//! Kafka-backed [`EventSink`]: topic is the exchange, message key is the routing key.

use crate::model::OrderEvent;
use crate::orders::events::{EventDestination, EventSink, PublishError};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SEND_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct KafkaEventSink {
    producer: Arc<FutureProducer>,
}

impl KafkaEventSink {
    pub fn new(brokers: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("acks", "1")
            // At most once: the producer must not resend on its own
            .set("retries", "0")
            .set("message.timeout.ms", "5000")
            .create()?;

        info!(%brokers, "Kafka producer initialized");
        Ok(Self {
            producer: Arc::new(producer),
        })
    }
}

#[async_trait]
impl EventSink for KafkaEventSink {
    async fn send(
        &self,
        destination: &EventDestination,
        event: OrderEvent,
    ) -> Result<(), PublishError> {
        let record = FutureRecord::to(&destination.exchange)
            .key(&destination.routing_key)
            .payload(&event.serialized_order)
            .timestamp(event.published_at.timestamp_millis());

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(SEND_TIMEOUT))
            .await
            .map_err(|(e, _)| PublishError::Send {
                destination: destination.to_string(),
                reason: e.to_string(),
            })?;

        debug!(%destination, partition, offset, "Delivered to Kafka");
        Ok(())
    }
}
