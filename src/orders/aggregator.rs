//! # Order Aggregator
//!
//! Prices a list of product ids against the catalog. Each id is looked up on its own, in
//! input order, one call at a time. Duplicates are looked up and priced once per
//! occurrence. A miss lands in `products_not_found` and the run goes on. A catalog that
//! cannot be reached aborts the whole run and nothing partial is returned.

use crate::lookup::{Lookup, ProductLookup};
use crate::model::{OrderItem, ProductId, ProductRecord, SimulatedOrder};
use crate::orders::OrderError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct OrderAggregator {
    lookup: Arc<dyn ProductLookup>,
}

impl OrderAggregator {
    pub fn new(lookup: Arc<dyn ProductLookup>) -> Self {
        Self { lookup }
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn simulate(&self, ids: &[ProductId]) -> Result<SimulatedOrder, OrderError> {
        let mut order = SimulatedOrder::default();

        for &id in ids {
            match self.lookup.find(id).await? {
                Lookup::Found(record) => {
                    order.total_amount = order
                        .total_amount
                        .checked_add(record.price)
                        .ok_or(OrderError::TotalOverflow)?;
                    order.items.push(OrderItem::new(id, record.price));
                }
                Lookup::NotFound => {
                    debug!(%id, "Product not found");
                    order.products_not_found.push(id);
                }
            }
        }

        info!(
            items = order.items.len(),
            not_found = order.products_not_found.len(),
            total = %order.total_amount,
            "Order simulated"
        );
        Ok(order)
    }

    /// The catalog listing, relayed as-is.
    #[instrument(skip(self))]
    pub async fn available_products(&self) -> Result<Vec<ProductRecord>, OrderError> {
        Ok(self.lookup.list().await?)
    }
}
