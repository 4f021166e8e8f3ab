use anyhow::Context;
use order_gateway::config::OrderServiceConfig;
use order_gateway::gateway::StaticServiceDiscovery;
use order_gateway::lifecycle::setup_tracing;
use order_gateway::lookup::HttpProductLookup;
use order_gateway::orders::http::{router, OrderState};
use order_gateway::orders::{
    ChannelEventSink, EventDestination, EventSink, OrderAggregator, OrderEventListener,
    OrderEventPublisher,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = OrderServiceConfig::from_env()?;
    let discovery = Arc::new(StaticServiceDiscovery::new(config.registry.clone()));
    let lookup = HttpProductLookup::new(
        discovery,
        config.catalog_service.clone(),
        config.upstream_timeout,
    )
    .context("Failed to build catalog client")?;

    let destination = EventDestination::new(&config.event_exchange, &config.event_routing_key);
    let sink = event_sink(&config)?;
    let state = OrderState {
        aggregator: OrderAggregator::new(Arc::new(lookup)),
        publisher: OrderEventPublisher::new(sink, destination),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, catalog = %config.catalog_service, "Order simulator listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

#[cfg(feature = "kafka")]
fn event_sink(config: &OrderServiceConfig) -> anyhow::Result<Arc<dyn EventSink>> {
    if let Some(brokers) = &config.kafka_brokers {
        let sink = order_gateway::orders::kafka::KafkaEventSink::new(brokers)
            .context("Failed to create Kafka producer")?;
        return Ok(Arc::new(sink));
    }
    Ok(channel_sink())
}

#[cfg(not(feature = "kafka"))]
fn event_sink(config: &OrderServiceConfig) -> anyhow::Result<Arc<dyn EventSink>> {
    if config.kafka_brokers.is_some() {
        tracing::warn!("KAFKA_BROKERS is set but the kafka feature is disabled");
    }
    Ok(channel_sink())
}

fn channel_sink() -> Arc<dyn EventSink> {
    let (sink, receiver) = ChannelEventSink::new(256);
    OrderEventListener::spawn(receiver);
    Arc::new(sink)
}
