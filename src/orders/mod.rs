//! # Order Simulator
//!
//! Prices a basket of product ids against the catalog and announces the result.
//!
//! ## Structure
//!
//! - [`aggregator`] - [`OrderAggregator`], the per-id lookup fan-out
//! - [`error`] - [`OrderError`]
//! - [`events`] - best-effort [`OrderEventPublisher`] and its sinks
//! - [`http`] - axum routes

pub mod aggregator;
pub mod error;
pub mod events;
pub mod http;
#[cfg(feature = "kafka")]
pub mod kafka;

pub use aggregator::OrderAggregator;
pub use error::OrderError;
pub use events::{
    ChannelEventSink, DeliveredEvent, EventDestination, EventSink, OrderEventListener,
    OrderEventPublisher, PublishError,
};
