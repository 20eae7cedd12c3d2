use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle event types emitted by the order workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderCreated,
    OrderStatusUpdated,
    OrderCancelled,
}

/// Snapshot of a line item carried inside a lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemSummary {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Lifecycle event handed off to the external delivery mechanism.
///
/// Constructed exactly once per triggering transition; the delivery
/// transport (queue/topic) is outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub event_id: Uuid,
    pub event_type: OrderEventType,
    pub order_id: Uuid,
    pub order_number: String,
    pub user_id: Option<i64>,
    pub previous_status: Option<String>,
    pub current_status: Option<String>,
    pub total_amount: Option<Decimal>,
    pub items: Vec<OrderItemSummary>,
    pub timestamp: DateTime<Utc>,
}

impl OrderEvent {
    fn new(event_type: OrderEventType, order_id: Uuid, order_number: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            order_id,
            order_number,
            user_id: None,
            previous_status: None,
            current_status: None,
            total_amount: None,
            items: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn created(
        order_id: Uuid,
        order_number: String,
        user_id: i64,
        total_amount: Decimal,
        items: Vec<OrderItemSummary>,
    ) -> Self {
        let mut event = Self::new(OrderEventType::OrderCreated, order_id, order_number);
        event.user_id = Some(user_id);
        event.current_status = Some("PENDING".to_string());
        event.total_amount = Some(total_amount);
        event.items = items;
        event
    }

    pub fn status_updated(
        order_id: Uuid,
        order_number: String,
        previous_status: String,
        current_status: String,
    ) -> Self {
        let mut event = Self::new(OrderEventType::OrderStatusUpdated, order_id, order_number);
        event.previous_status = Some(previous_status);
        event.current_status = Some(current_status);
        event
    }

    pub fn cancelled(
        order_id: Uuid,
        order_number: String,
        user_id: i64,
        items: Vec<OrderItemSummary>,
    ) -> Self {
        let mut event = Self::new(OrderEventType::OrderCancelled, order_id, order_number);
        event.user_id = Some(user_id);
        event.current_status = Some("CANCELLED".to_string());
        event.items = items;
        event
    }
}
