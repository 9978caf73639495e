pub mod model;
pub mod service;
pub mod store;

pub use model::{CreateOrder, Order, OrderPage, OrderStatus};
pub use service::{OrderError, OrderService};
pub use store::OrderStore;
