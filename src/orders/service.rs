//! Order Service - the instrumented request lifecycle
//! Every operation opens one named span; log events land in whichever span
//! is active when they fire, which is what lets a backend join logs to traces.

use crate::observability::metrics;
use crate::orders::model::{generate_order_id, CreateOrder, Order, OrderPage, OrderStatus};
use crate::orders::store::OrderStore;

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("quantity must be >= 1, got {0}")]
    InvalidQuantity(i64),
    #[error("Order not found: {0}")]
    NotFound(String),
}

pub struct OrderService {
    store: Arc<OrderStore>,
    persist_delay: Duration,
}

impl OrderService {
    pub fn new(store: Arc<OrderStore>, persist_delay: Duration) -> Self {
        Self {
            store,
            persist_delay,
        }
    }

    // =====================================================
    // CREATE (validate -> persist)
    // =====================================================

    #[instrument(
        name = "create_order",
        skip_all,
        fields(http.method = "POST", http.route = "/orders")
    )]
    pub async fn create_order(&self, req: CreateOrder) -> Result<Order, OrderError> {
        let _timer = metrics::operation_timer("create_order");
        self.validate_order(&req)?;
        let order_id = generate_order_id();
        Ok(self.persist_order(order_id, req).await)
    }

    #[instrument(
        name = "validate_order",
        skip_all,
        fields(order.item = %req.item, order.quantity = req.quantity)
    )]
    fn validate_order(&self, req: &CreateOrder) -> Result<(), OrderError> {
        if req.quantity < 1 {
            warn!(quantity = req.quantity, "Order rejected: quantity < 1");
            if let Some(ref m) = *metrics::get_metrics() {
                m.orders_rejected_total.inc();
            }
            return Err(OrderError::InvalidQuantity(req.quantity));
        }
        info!(item = %req.item, quantity = req.quantity, "Order validated");
        Ok(())
    }

    #[instrument(name = "persist_order", skip_all, fields(order.id = %order_id))]
    async fn persist_order(&self, order_id: String, req: CreateOrder) -> Order {
        // Simulate a tiny bit of work
        tokio::time::sleep(self.persist_delay).await;
        let order = Order {
            id: order_id,
            item: req.item,
            quantity: req.quantity,
            status: OrderStatus::Created,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.store.insert(order.clone()).await;
        info!(order_id = %order.id, item = %order.item, "Order persisted");
        if let Some(ref m) = *metrics::get_metrics() {
            m.orders_created_total.inc();
        }
        order
    }

    // =====================================================
    // LIST / GET / COMPLETE
    // =====================================================

    #[instrument(name = "list_orders", skip_all, fields(query.limit = limit))]
    pub async fn list_orders(&self, limit: usize) -> OrderPage {
        let _timer = metrics::operation_timer("list_orders");
        let orders = self.store.list(limit).await;
        info!(count = orders.len(), limit, "List orders");
        OrderPage {
            count: orders.len(),
            orders,
        }
    }

    #[instrument(name = "get_order", skip_all, fields(order.id = %id))]
    pub async fn get_order(&self, id: &str) -> Result<Order, OrderError> {
        let _timer = metrics::operation_timer("get_order");
        match self.store.get(id).await {
            Some(order) => {
                info!(order_id = %id, "Order retrieved");
                Ok(order)
            }
            None => {
                warn!(order_id = %id, "Order not found");
                if let Some(ref m) = *metrics::get_metrics() {
                    m.lookups_failed_total.inc();
                }
                Err(OrderError::NotFound(id.to_string()))
            }
        }
    }

    /// Transitions unconditionally when the order exists; a second completion
    /// overwrites the timestamp rather than being rejected.
    #[instrument(name = "complete_order", skip_all, fields(order.id = %id))]
    pub async fn complete_order(&self, id: &str) -> Result<Order, OrderError> {
        let _timer = metrics::operation_timer("complete_order");
        match self
            .store
            .update_status(id, OrderStatus::Completed, Utc::now())
            .await
        {
            Some(order) => {
                info!(order_id = %id, "Order completed");
                if let Some(ref m) = *metrics::get_metrics() {
                    m.orders_completed_total.inc();
                }
                Ok(order)
            }
            None => {
                warn!(order_id = %id, "Complete failed: order not found");
                if let Some(ref m) = *metrics::get_metrics() {
                    m.lookups_failed_total.inc();
                }
                Err(OrderError::NotFound(id.to_string()))
            }
        }
    }
}
