//! # Order Gateway
//!
//! > **An edge gateway in front of an order simulator and a product catalog.**
//!
//! Three processes share this crate:
//!
//! - **`api-gateway`** checks a shared bearer secret on every request, then routes by
//!   path prefix to a logical backend service and forwards to one of its instances.
//! - **`order-simulator`** prices a basket of product ids against the catalog, one lookup
//!   per id, and publishes the result as a best-effort event.
//! - **`product-catalog`** serves a small in-memory catalog held by an actor.
//!
//! ```text
//! client ──► api-gateway ──► AuthGuard ──► RouteTable ──► discovery ──► upstream
//!                                                                        │
//!                           ┌────────────────────────────────────────────┘
//!                           ▼
//!                  order-simulator ──► OrderAggregator ──► ProductLookup (N calls)
//!                           │                                  │
//!                           └─► OrderEventPublisher            └─► product-catalog
//! ```
//!
//! ## Architecture Notes
//!
//! ### 1. Guard before route
//! The gateway decides on credentials before it looks at the route table. A rejected
//! request never reaches discovery or an upstream. Public paths (the health check) skip
//! the credential check entirely.
//!
//! ### 2. Absence is a value
//! A product that does not exist is [`Lookup::NotFound`](lookup::Lookup::NotFound), not an
//! error. Only a catalog that cannot be reached is an error, and it aborts the whole
//! simulation with no partial result.
//!
//! ### 3. Exact money
//! Prices and totals are [`Money`](model::Money): integer hundredths, never floats.
//!
//! ### 4. At-most-once events
//! Publishing is spawned after the response is built. Failures are logged and dropped.
//!
//! ### 5. Actors for in-process state
//! The catalog is a [`ResourceActor`](framework::ResourceActor): one task owns the store
//! and serves requests sequentially, so no locks are needed. Tests replace it with a
//! [`MockClient`](framework::mock::MockClient).
//!
//! ## Module Tour
//!
//! - [`framework`] - generic resource actor, client and mocks
//! - [`model`] - products, orders, money
//! - [`catalog`] - the product catalog actor and its HTTP routes
//! - [`lookup`] - the [`ProductLookup`](lookup::ProductLookup) seam (actor or HTTP)
//! - [`orders`] - aggregation, events, order HTTP routes
//! - [`gateway`] - guard, routes, discovery, forwarding
//! - [`config`] - environment configuration
//! - [`lifecycle`] - tracing and catalog start/stop
//! - [`health`] - shared liveness endpoint
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run --bin product-catalog
//! RUST_LOG=info cargo run --bin order-simulator
//! AUTH_TOKEN=s3cret RUST_LOG=info cargo run --bin api-gateway
//!
//! curl -H 'Authorization: Bearer s3cret' -H 'Content-Type: application/json' \
//!      -d '[1, 2, 99]' http://localhost:8080/orders/simulate
//! ```

pub mod catalog;
pub mod config;
pub mod framework;
pub mod gateway;
pub mod health;
pub mod lifecycle;
pub mod lookup;
pub mod model;
pub mod orders;
