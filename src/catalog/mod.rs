//! # Product Catalog
//!
//! An in-memory product catalog run as a [`ResourceActor`] over [`ProductRecord`]. It is
//! the local stand-in for the catalog service: the `product-catalog` binary serves it over
//! HTTP, and tests hand its [`CatalogClient`] straight to the order aggregator.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`ProductRecord`]
//! - [`error`] - [`CatalogError`]
//! - [`client`] - [`CatalogClient`], which also implements [`ProductLookup`](crate::lookup::ProductLookup)
//! - [`http`] - read-only routes
//!
//! ## Usage
//!
//! ```rust
//! use order_gateway::catalog::{self, CatalogClient};
//! use order_gateway::lookup::{Lookup, ProductLookup};
//! use order_gateway::model::{Money, ProductDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = catalog::new();
//!     let client = CatalogClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .create_product(ProductDraft::new("Mouse", "Wireless", Money::from_minor_units(15_000)))
//!         .await?;
//!     assert!(matches!(client.find(id).await?, Lookup::Found(_)));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod entity;
pub mod error;
pub mod http;

pub use client::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::ProductRecord;

/// Creates a new catalog actor and its client.
pub fn new() -> (ResourceActor<ProductRecord>, ResourceClient<ProductRecord>) {
    ResourceActor::new(32)
}
