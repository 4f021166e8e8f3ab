//! # Product Lookup
//!
//! The order simulator only ever needs two things from the catalog: one product by id,
//! and the full listing. [`ProductLookup`] is that seam. Absence is an ordinary
//! [`Lookup::NotFound`] value; only a catalog that cannot be reached is an error.
//!
//! Two implementations ship with the crate:
//! - [`CatalogClient`](crate::catalog::CatalogClient) talks to the in-process catalog actor.
//! - [`HttpProductLookup`] calls a remote catalog service resolved through discovery.

use crate::gateway::discovery::ServiceDiscovery;
use crate::model::{ProductId, ProductRecord};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Outcome of looking up one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ProductRecord),
    NotFound,
}

/// The catalog could not answer at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No reachable instance of {service}")]
    NoInstance { service: String },
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },
}

#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Resolve one id to a priced record.
    async fn find(&self, id: ProductId) -> Result<Lookup, LookupError>;

    /// Every product the catalog currently offers.
    async fn list(&self) -> Result<Vec<ProductRecord>, LookupError>;
}

#[async_trait]
impl<L: ProductLookup + ?Sized> ProductLookup for Arc<L> {
    async fn find(&self, id: ProductId) -> Result<Lookup, LookupError> {
        (**self).find(id).await
    }

    async fn list(&self) -> Result<Vec<ProductRecord>, LookupError> {
        (**self).list().await
    }
}

/// Looks products up over HTTP on whichever catalog instance discovery hands out.
///
/// `GET /products/{id}`: 200 is a hit, 404 a miss, anything else (or no answer) is
/// [`LookupError::Unavailable`].
pub struct HttpProductLookup {
    client: reqwest::Client,
    discovery: Arc<dyn ServiceDiscovery>,
    service: String,
}

impl HttpProductLookup {
    pub fn new(
        discovery: Arc<dyn ServiceDiscovery>,
        service: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            discovery,
            service: service.into(),
        })
    }

    fn base_url(&self) -> Result<String, LookupError> {
        self.discovery
            .next_instance(&self.service)
            .ok_or_else(|| LookupError::NoInstance {
                service: self.service.clone(),
            })
    }

    fn unavailable(&self, reason: impl ToString) -> LookupError {
        LookupError::Unavailable {
            service: self.service.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl ProductLookup for HttpProductLookup {
    #[instrument(skip(self), fields(service = %self.service))]
    async fn find(&self, id: ProductId) -> Result<Lookup, LookupError> {
        let url = format!("{}/products/{}", self.base_url()?, id);
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "Catalog request failed");
            self.unavailable(e)
        })?;

        match response.status() {
            StatusCode::OK => {
                let record = response
                    .json::<ProductRecord>()
                    .await
                    .map_err(|e| self.unavailable(e))?;
                debug!(%id, "Found");
                Ok(Lookup::Found(record))
            }
            StatusCode::NOT_FOUND => {
                debug!(%id, "Not found");
                Ok(Lookup::NotFound)
            }
            status => Err(self.unavailable(format!("unexpected status {status}"))),
        }
    }

    #[instrument(skip(self), fields(service = %self.service))]
    async fn list(&self) -> Result<Vec<ProductRecord>, LookupError> {
        let url = format!("{}/products", self.base_url()?);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(|e| self.unavailable(e)),
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            status => Err(self.unavailable(format!("unexpected status {status}"))),
        }
    }
}
