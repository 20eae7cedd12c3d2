use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vendo_core::PaymentMethod;
use vendo_shared::{round_money, OrderItemSummary};

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
        }
    }
}

/// Line item as requested by the caller; ids and subtotals are assigned
/// by the workflow at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// An individual product line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl OrderItem {
    pub fn from_request(request: NewLineItem) -> Self {
        let subtotal = round_money(request.unit_price * Decimal::from(request.quantity));
        Self {
            id: Uuid::new_v4(),
            product_id: request.product_id,
            product_name: request.product_name,
            quantity: request.quantity,
            unit_price: request.unit_price,
            subtotal,
        }
    }
}

/// A customer's order. Never physically deleted; terminal states are
/// retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub order_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        user_id: i64,
        items: Vec<OrderItem>,
        shipping_address: String,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let total_amount = round_money(items.iter().map(|item| item.subtotal).sum());
        Self {
            id,
            order_number: generate_order_number(&id),
            user_id,
            items,
            total_amount,
            status: OrderStatus::Pending,
            shipping_address,
            payment_method,
            order_date: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    /// Line item snapshots for lifecycle events
    pub fn item_summaries(&self) -> Vec<OrderItemSummary> {
        self.items
            .iter()
            .map(|item| OrderItemSummary {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect()
    }
}

/// Format: ORD-{date}-{short id}
fn generate_order_number(order_id: &Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let short_id = &order_id.simple().to_string()[..6];
    format!("ORD-{}-{}", date, short_id.to_uppercase())
}
