//! # Observability & Tracing
//!
//! [`setup_tracing`] installs one `tracing-subscriber` for the whole process. Every binary
//! calls it first thing.
//!
//! - **Configurable log levels** via `RUST_LOG` (unset means errors only)
//! - **Compact format** with spans shown inline and no module prefix
//!
//! ```bash
//! RUST_LOG=info cargo run --bin api-gateway
//!
//! # Per-request detail: routing decisions, instance picks, lookups
//! RUST_LOG=debug cargo run --bin order-simulator
//!
//! RUST_LOG=order_gateway::gateway=debug cargo run --bin api-gateway
//! ```
//!
//! A simulated order at `info` looks like:
//!
//! ```text
//! INFO simulate{count=3}: Order simulated items=2 not_found=1 total=5150.00
//! ```
//!
//! Swallowed publish failures show up at `warn` with the destination and the reason.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
