use crate::models::{NewLineItem, Order, OrderItem, OrderStatus};
use crate::store::OrderStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vendo_catalog::InventoryLedger;
use vendo_core::{CoreError, CoreResult, EventSink, PaymentMethod};
use vendo_coupon::CouponLedger;
use vendo_payment::ConfirmOrder;
use vendo_shared::OrderEvent;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl From<OrderError> for CoreError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => CoreError::NotFound(err.to_string()),
            OrderError::InvalidTransition { .. } => CoreError::InvalidState(err.to_string()),
        }
    }
}

/// Owns the order lifecycle and orchestrates the inventory and coupon
/// ledgers. Reserving stock, charging payment, and updating status stay
/// three independent critical sections with compensating actions; no
/// lock spans two components.
pub struct OrderWorkflow {
    store: Arc<dyn OrderStore>,
    inventory: Arc<InventoryLedger>,
    coupons: Arc<CouponLedger>,
    events: Arc<dyn EventSink>,
}

impl OrderWorkflow {
    pub fn new(
        store: Arc<dyn OrderStore>,
        inventory: Arc<InventoryLedger>,
        coupons: Arc<CouponLedger>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            inventory,
            coupons,
            events,
        }
    }

    /// Create an order in PENDING. Subtotals and the total are computed
    /// here once; an optional coupon discounts the total with the
    /// ledger's permissive pass-through rules. Stock is not reserved at
    /// creation; `reserve_order_stock` is the explicit next step.
    pub fn create_order(
        &self,
        user_id: i64,
        items: Vec<NewLineItem>,
        shipping_address: String,
        payment_method: PaymentMethod,
        coupon_code: Option<&str>,
    ) -> Order {
        let items: Vec<OrderItem> = items.into_iter().map(OrderItem::from_request).collect();
        let mut order = Order::new(user_id, items, shipping_address, payment_method);

        if let Some(code) = coupon_code {
            order.total_amount = self.coupons.apply_coupon(code, order.total_amount);
        }

        info!(
            "Order {} created for user {}: total={}, items={}",
            order.order_number,
            user_id,
            order.total_amount,
            order.items.len()
        );
        self.store.save(order.clone());
        self.events.publish(OrderEvent::created(
            order.id,
            order.order_number.clone(),
            order.user_id,
            order.total_amount,
            order.item_summaries(),
        ));
        order
    }

    /// Transition an order to a new status. Transitions are permissive
    /// (skipping states is allowed); the only guard rejects cancellation
    /// of a shipped or delivered order.
    pub fn update_order_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut order = self.load(order_id)?;

        if new_status == OrderStatus::Cancelled {
            Self::ensure_cancellable(&order)?;
        }

        let previous = order.status;
        order.update_status(new_status);
        self.store.save(order.clone());
        self.events.publish(OrderEvent::status_updated(
            order.id,
            order.order_number.clone(),
            previous.as_str().to_string(),
            new_status.as_str().to_string(),
        ));
        info!(
            "Order {} status {} -> {}",
            order.order_number,
            previous.as_str(),
            new_status.as_str()
        );
        Ok(order)
    }

    /// Cancel an order and release its reserved stock. Rejected once the
    /// order has shipped or been delivered.
    pub fn cancel_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        let mut order = self.load(order_id)?;
        Self::ensure_cancellable(&order)?;

        order.update_status(OrderStatus::Cancelled);
        self.store.save(order.clone());

        for item in &order.items {
            self.inventory.release_stock(item.product_id, item.quantity);
        }

        self.events.publish(OrderEvent::cancelled(
            order.id,
            order.order_number.clone(),
            order.user_id,
            order.item_summaries(),
        ));
        info!("Order {} cancelled", order.order_number);
        Ok(order)
    }

    /// Reserve stock for every line item. On a failed line the lines
    /// already reserved are released again and false is returned; there
    /// is no cross-item atomicity beyond this compensation.
    pub fn reserve_order_stock(&self, order_id: Uuid) -> CoreResult<bool> {
        let order = self.load(order_id)?;

        let mut reserved: Vec<&OrderItem> = Vec::new();
        for item in &order.items {
            if self.inventory.reserve_stock(item.product_id, item.quantity)? {
                reserved.push(item);
            } else {
                warn!(
                    "Order {}: reservation failed for product {}; releasing {} prior line(s)",
                    order.order_number,
                    item.product_id,
                    reserved.len()
                );
                for prior in reserved {
                    self.inventory.release_stock(prior.product_id, prior.quantity);
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Post-payment step: move the order to CONFIRMED and make the stock
    /// deduction permanent for every line item.
    pub fn confirm_payment(&self, order_id: Uuid) -> CoreResult<()> {
        let order = self.update_order_status(order_id, OrderStatus::Confirmed)?;
        for item in &order.items {
            self.inventory.confirm_stock_reduction(item.product_id, item.quantity)?;
        }
        Ok(())
    }

    pub fn order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        self.load(order_id)
    }

    pub fn orders_by_user(&self, user_id: i64) -> Vec<Order> {
        self.store.find_by_user(user_id)
    }

    pub fn all_orders(&self) -> Vec<Order> {
        self.store.find_all()
    }

    fn load(&self, order_id: Uuid) -> Result<Order, OrderError> {
        self.store
            .find_by_id(order_id)
            .ok_or(OrderError::NotFound(order_id))
    }

    fn ensure_cancellable(order: &Order) -> Result<(), OrderError> {
        if matches!(order.status, OrderStatus::Shipped | OrderStatus::Delivered) {
            return Err(OrderError::InvalidTransition {
                from: order.status.as_str().to_string(),
                to: "CANCELLED".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfirmOrder for OrderWorkflow {
    fn confirm_order(&self, order_id: Uuid) -> CoreResult<()> {
        self.confirm_payment(order_id)
    }
}
