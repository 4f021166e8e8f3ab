//! # Catalog Client
//!
//! Wraps a `ResourceClient<ProductRecord>` and exposes it as a [`ProductLookup`].
use crate::catalog::CatalogError;
use crate::framework::{FrameworkError, ResourceClient};
use crate::lookup::{Lookup, LookupError, ProductLookup};
use crate::model::{ProductDraft, ProductId, ProductRecord};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Logical name the in-process catalog reports in lookup errors.
const SERVICE: &str = "catalog-actor";

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<ProductRecord>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<ProductRecord>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<ProductId, CatalogError> {
        debug!("Sending request");
        self.inner
            .create(draft)
            .await
            .map_err(|e| CatalogError::ActorCommunicationError(e.to_string()))
    }

    fn map_error(e: FrameworkError) -> LookupError {
        LookupError::Unavailable {
            service: SERVICE.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl ProductLookup for CatalogClient {
    #[instrument(skip(self))]
    async fn find(&self, id: ProductId) -> Result<Lookup, LookupError> {
        debug!("Sending request");
        match self.inner.get(id).await.map_err(Self::map_error)? {
            Some(record) => Ok(Lookup::Found(record)),
            None => Ok(Lookup::NotFound),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ProductRecord>, LookupError> {
        debug!("Sending request");
        self.inner.list().await.map_err(Self::map_error)
    }
}
