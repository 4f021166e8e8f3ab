use anyhow::Context;
use order_gateway::catalog;
use order_gateway::config::CatalogConfig;
use order_gateway::lifecycle::{setup_tracing, CatalogSystem};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = CatalogConfig::from_env()?;
    let system = CatalogSystem::new();
    system
        .seed(CatalogSystem::demo_products())
        .await
        .context("Failed to seed catalog")?;

    let app = catalog::http::router(system.catalog_client.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Product catalog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    system.shutdown().await.map_err(anyhow::Error::msg)?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
