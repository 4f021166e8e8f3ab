use anyhow::Context;
use order_gateway::config::GatewayConfig;
use order_gateway::gateway::{
    http, AuthGuard, Dispatcher, HttpUpstream, RouteTable, StaticServiceDiscovery,
};
use order_gateway::lifecycle::setup_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = GatewayConfig::from_env()?;
    let discovery = StaticServiceDiscovery::new(config.registry.clone());
    let upstream = HttpUpstream::new(config.upstream_timeout)?;
    let dispatcher = Dispatcher::new(
        AuthGuard::new(config.auth_token.clone(), config.public_paths.clone()),
        RouteTable::new(config.routes.clone()),
        Arc::new(discovery),
        Arc::new(upstream),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        addr = %config.bind_addr,
        routes = config.routes.len(),
        "API gateway listening"
    );

    axum::serve(listener, http::router(Arc::new(dispatcher)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
