use crate::catalog::{CatalogClient, CatalogError};
use crate::model::{Money, ProductDraft, ProductId};
use tracing::{error, info};

/// Owns the running catalog actor.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::new();
/// system.seed(CatalogSystem::demo_products()).await?;
/// let router = catalog::http::router(system.catalog_client.clone());
/// // ... serve ...
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    pub catalog_client: CatalogClient,

    /// Task handle of the actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogSystem {
    /// Spawns the catalog actor. Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        let (actor, client) = crate::catalog::new();
        let handle = tokio::spawn(actor.run(()));

        Self {
            catalog_client: CatalogClient::new(client),
            handle,
        }
    }

    /// Adds `products` in order; ids are handed out from 1.
    pub async fn seed(&self, products: Vec<ProductDraft>) -> Result<Vec<ProductId>, CatalogError> {
        let mut ids = Vec::with_capacity(products.len());
        for draft in products {
            ids.push(self.catalog_client.create_product(draft).await?);
        }
        info!(count = ids.len(), "Catalog seeded");
        Ok(ids)
    }

    /// The starter catalog the `product-catalog` binary serves.
    pub fn demo_products() -> Vec<ProductDraft> {
        vec![
            ProductDraft::new("Notebook", "14 inch, 16 GB RAM", Money::from_minor_units(500_000)),
            ProductDraft::new("Mouse", "Wireless optical mouse", Money::from_minor_units(15_000)),
            ProductDraft::new("Keyboard", "Mechanical keyboard", Money::from_minor_units(35_000)),
        ]
    }

    /// Drops the client so the actor's channel closes, then waits for the actor task.
    ///
    /// Clones of `catalog_client` held elsewhere keep the actor alive until they are
    /// dropped too.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");
        drop(self.catalog_client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}

impl Default for CatalogSystem {
    fn default() -> Self {
        Self::new()
    }
}
