use crate::models::{Order, OrderStatus};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Durable storage boundary for orders. The core treats persistence as
/// a keyed store with these query shapes; the backing technology lives
/// outside the workspace.
pub trait OrderStore: Send + Sync {
    fn save(&self, order: Order);
    fn find_by_id(&self, order_id: Uuid) -> Option<Order>;
    /// Orders for a user, newest first.
    fn find_by_user(&self, user_id: i64) -> Vec<Order>;
    fn find_all(&self) -> Vec<Order>;
    fn find_by_status(&self, status: OrderStatus) -> Vec<Order>;
    /// Orders whose order date falls inside the inclusive range.
    fn find_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Order>;
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn save(&self, order: Order) {
        self.orders.write().insert(order.id, order);
    }

    fn find_by_id(&self, order_id: Uuid) -> Option<Order> {
        self.orders.read().get(&order_id).cloned()
    }

    fn find_by_user(&self, user_id: i64) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }

    fn find_all(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    fn find_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|order| order.status == status)
            .cloned()
            .collect()
    }

    fn find_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|order| order.order_date >= start && order.order_date <= end)
            .cloned()
            .collect()
    }
}
