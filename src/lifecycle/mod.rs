//! Process lifecycle: tracing setup and the catalog actor's start and shutdown.
//!
//! - [`CatalogSystem`] - spawns, seeds and shuts down the catalog actor
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use tracing::*;
