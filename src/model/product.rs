use crate::model::Money;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for products.
///
/// Identifiers are positive; the catalog hands them out starting at 1. Callers may repeat
/// an id any number of times in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(u64::from(id))
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A priced catalog entry.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait
/// (see [`catalog::entity`](crate::catalog::entity)), allowing it to be held by a
/// [`ResourceActor`](crate::framework::ResourceActor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
}

impl ProductRecord {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

/// Payload for adding a product to the in-memory catalog.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}
