//! Order Repository
//!
//! Orders are the most mutable domain, so they carry the shortest entity TTL
//! and every mutation drops the owning user's order list.

use std::sync::Arc;

use crate::datastore::Datastore;
use crate::domain::{Order, OrderDraft, OrderStatus};
use crate::error::Result;
use crate::registry::CacheRegistry;

#[derive(Clone)]
pub struct OrderRepository {
    datastore: Arc<dyn Datastore>,
    caches: CacheRegistry,
}

impl OrderRepository {
    pub fn new(datastore: Arc<dyn Datastore>, caches: CacheRegistry) -> Self {
        Self { datastore, caches }
    }

    // == Reads ==
    /// Single order by id.
    pub async fn order(&self, id: &str) -> Result<Option<Order>> {
        if let Some(order) = self.caches.order(id).await {
            return Ok(Some(order));
        }
        let fetched = self.datastore.fetch_order(id).await?;
        if let Some(order) = &fetched {
            self.caches.cache_order(order).await;
        }
        Ok(fetched)
    }

    /// A user's order history.
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        if let Some(orders) = self.caches.user_orders(user_id).await {
            return Ok(orders);
        }
        let orders = self.datastore.fetch_orders_for_user(user_id).await?;
        self.caches.cache_user_orders(user_id, &orders).await;
        Ok(orders)
    }

    // == Writes ==
    /// Places an order, then drops the user's cached history so it shows up
    /// on the next read.
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order> {
        let created = self.datastore.create_order(draft).await?;
        self.caches.invalidate_order(&created.id, &created.user_id).await;
        Ok(created)
    }

    /// Moves an order through its lifecycle.
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        let updated = self.datastore.update_order_status(id, status).await?;
        self.caches.invalidate_order(&updated.id, &updated.user_id).await;
        Ok(updated)
    }
}
