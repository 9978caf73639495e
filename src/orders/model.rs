//! Order record and wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =====================================================
// ORDER MODEL
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub item: String,
    pub quantity: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Present iff the order has been completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

// =====================================================
// CREATE ORDER REQUEST
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub item: String,

    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Short opaque id: the first hex group of a v4 UUID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

// =====================================================
// LIST RESPONSE
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub count: usize,
}
