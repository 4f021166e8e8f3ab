//! Generic actor framework for in-process resources.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns the store and serves requests sequentially
//! - [`ResourceClient`] - Cloneable handle for sending requests to the actor
//! - [`FrameworkError`] - Plumbing failures (actor gone, entity rejected the request)
//!
//! # Testing
//!
//! See [`mock`] for utilities that answer client requests without spawning an actor.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
