use crate::model::{Money, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every occurrence of an id in a simulation counts as one unit.
pub const UNITS_PER_OCCURRENCE: u32 = 1;

/// One priced line of a simulated order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn new(product_id: ProductId, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity: UNITS_PER_OCCURRENCE,
            unit_price,
        }
    }
}

/// The reconciled result of a simulation.
///
/// `items` keeps the input order of the ids that were found, `products_not_found` the
/// input order of those that were not; together they account for every input id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedOrder {
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub products_not_found: Vec<ProductId>,
}

/// A simulated order as handed to the messaging collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    /// JSON encoding of the [`SimulatedOrder`], identical to the HTTP response body.
    pub serialized_order: String,
    pub published_at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn from_order(order: &SimulatedOrder) -> Result<Self, serde_json::Error> {
        Ok(Self {
            serialized_order: serde_json::to_string(order)?,
            published_at: Utc::now(),
        })
    }
}
