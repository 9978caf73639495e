//! In-Memory Order Store
//! Demonstration storage: one coarse lock, no durability, no eviction

use crate::orders::model::{Order, OrderStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreInner {
    orders: HashMap<String, Order>,
    // ids in the order they were inserted, so list() can window by recency
    insertion: Vec<String>,
}

/// Owns every order record; only the service mutates through it.
#[derive(Default)]
pub struct OrderStore {
    inner: RwLock<StoreInner>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        let mut inner = self.inner.write().await;
        inner.insertion.push(order.id.clone());
        inner.orders.insert(order.id.clone(), order);
    }

    pub async fn get(&self, id: &str) -> Option<Order> {
        self.inner.read().await.orders.get(id).cloned()
    }

    /// The most recently inserted `limit` orders, insertion order preserved
    /// (oldest of the window first). `limit == 0` yields an empty page.
    pub async fn list(&self, limit: usize) -> Vec<Order> {
        let inner = self.inner.read().await;
        let skip = inner.insertion.len().saturating_sub(limit);
        inner.insertion[skip..]
            .iter()
            .filter_map(|id| inner.orders.get(id).cloned())
            .collect()
    }

    /// In-place status write; returns the updated snapshot, or `None` for an
    /// unknown id. `completed_at` tracks the status: set on completion,
    /// cleared otherwise.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        timestamp: DateTime<Utc>,
    ) -> Option<Order> {
        let mut inner = self.inner.write().await;
        let order = inner.orders.get_mut(id)?;
        order.status = status;
        order.completed_at = match status {
            OrderStatus::Completed => Some(timestamp),
            OrderStatus::Created => None,
        };
        Some(order.clone())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
