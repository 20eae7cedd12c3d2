//! End-to-end checkout flow across the workflow, inventory ledger,
//! coupon ledger, and payment processor, with a deterministic gateway.

use rust_decimal_macros::dec;
use std::sync::Arc;
use vendo_catalog::{InMemoryCatalog, InventoryLedger, Product, ProductCatalog};
use vendo_core::{EventSink, MemoryEventSink, PaymentMethod, PaymentStatus};
use vendo_coupon::{CouponLedger, DiscountKind};
use vendo_order::{InMemoryOrderStore, NewLineItem, OrderStatus, OrderWorkflow};
use vendo_payment::{ConfirmOrder, FixedOutcomeGateway, PaymentProcessor};
use vendo_shared::OrderEventType;

struct Checkout {
    catalog: Arc<InMemoryCatalog>,
    inventory: Arc<InventoryLedger>,
    coupons: Arc<CouponLedger>,
    events: Arc<MemoryEventSink>,
    workflow: Arc<OrderWorkflow>,
    processor: PaymentProcessor,
}

fn checkout(gateway_succeeds: bool) -> Checkout {
    let catalog = Arc::new(InMemoryCatalog::new());
    let inventory = Arc::new(InventoryLedger::new(
        Arc::clone(&catalog) as Arc<dyn ProductCatalog>
    ));
    let coupons = Arc::new(CouponLedger::new());
    let events = Arc::new(MemoryEventSink::new());
    let workflow = Arc::new(OrderWorkflow::new(
        Arc::new(InMemoryOrderStore::new()),
        Arc::clone(&inventory),
        Arc::clone(&coupons),
        Arc::clone(&events) as Arc<dyn EventSink>,
    ));
    let processor = PaymentProcessor::new(
        Arc::new(FixedOutcomeGateway {
            succeed: gateway_succeeds,
        }),
        Arc::clone(&workflow) as Arc<dyn ConfirmOrder>,
    );
    Checkout {
        catalog,
        inventory,
        coupons,
        events,
        workflow,
        processor,
    }
}

fn two_headphones(checkout: &Checkout, stock: i32) -> (uuid::Uuid, NewLineItem) {
    let product_id = checkout
        .catalog
        .insert(Product::new("Wireless Headphones", dec!(79.99), stock));
    let line = NewLineItem {
        product_id,
        product_name: "Wireless Headphones".to_string(),
        quantity: 2,
        unit_price: dec!(79.99),
    };
    (product_id, line)
}

#[test]
fn successful_checkout_confirms_order_and_deducts_stock() {
    let checkout = checkout(true);
    let (product_id, line) = two_headphones(&checkout, 10);

    let order = checkout.workflow.create_order(
        10,
        vec![line],
        "1 Main St".to_string(),
        PaymentMethod::CreditCard,
        None,
    );
    assert_eq!(order.total_amount, dec!(159.98));

    assert!(checkout.workflow.reserve_order_stock(order.id).unwrap());
    assert_eq!(checkout.inventory.available_stock(product_id).unwrap(), 8);

    let payment = checkout
        .processor
        .process_payment(order.id, order.total_amount, "CREDIT_CARD");
    assert_eq!(payment.status, PaymentStatus::Completed);

    // Payment success flowed back into the workflow
    let confirmed = checkout.workflow.order(order.id).unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    // The reservation became a permanent deduction
    assert_eq!(checkout.catalog.find_product(product_id).unwrap().stock, 8);
    assert_eq!(checkout.inventory.available_stock(product_id).unwrap(), 8);

    let recorded = checkout.processor.payments_by_order(order.id);
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].status, PaymentStatus::Completed);
    assert_eq!(recorded[0].amount, dec!(159.98));

    let types: Vec<OrderEventType> = checkout
        .events
        .events()
        .iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![OrderEventType::OrderCreated, OrderEventType::OrderStatusUpdated]
    );
}

#[test]
fn declined_payment_leaves_order_pending_and_stock_reserved() {
    let checkout = checkout(false);
    let (product_id, line) = two_headphones(&checkout, 10);

    let order = checkout.workflow.create_order(
        10,
        vec![line],
        "1 Main St".to_string(),
        PaymentMethod::EWallet,
        None,
    );
    assert!(checkout.workflow.reserve_order_stock(order.id).unwrap());

    let payment = checkout
        .processor
        .process_payment(order.id, order.total_amount, "E_WALLET");
    assert_eq!(payment.status, PaymentStatus::Failed);

    // No confirmation happened; compensation is the caller's move
    assert_eq!(checkout.workflow.order(order.id).unwrap().status, OrderStatus::Pending);
    assert_eq!(checkout.inventory.available_stock(product_id).unwrap(), 8);

    // Cancelling releases the hold without touching total stock
    checkout.workflow.cancel_order(order.id).unwrap();
    assert_eq!(checkout.inventory.available_stock(product_id).unwrap(), 10);
    assert_eq!(checkout.catalog.find_product(product_id).unwrap().stock, 10);
}

#[test]
fn discounted_checkout_charges_the_discounted_total() {
    let checkout = checkout(true);
    let (_, line) = two_headphones(&checkout, 10);
    checkout
        .coupons
        .create_coupon("SAVE10", DiscountKind::Percentage, dec!(10), dec!(0), 5);

    let order = checkout.workflow.create_order(
        10,
        vec![line],
        "1 Main St".to_string(),
        PaymentMethod::CreditCard,
        Some("SAVE10"),
    );
    assert_eq!(order.total_amount, dec!(143.98));

    assert!(checkout.workflow.reserve_order_stock(order.id).unwrap());
    let payment = checkout
        .processor
        .process_payment(order.id, order.total_amount, "CREDIT_CARD");
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, dec!(143.98));
}

#[test]
fn refund_after_checkout_is_single_use() {
    let checkout = checkout(true);
    let (_, line) = two_headphones(&checkout, 10);

    let order = checkout.workflow.create_order(
        10,
        vec![line],
        "1 Main St".to_string(),
        PaymentMethod::BankTransfer,
        None,
    );
    assert!(checkout.workflow.reserve_order_stock(order.id).unwrap());
    let payment = checkout
        .processor
        .process_payment(order.id, order.total_amount, "BANK_TRANSFER");
    let txn_id = payment.transaction_id.unwrap();

    let refund = checkout.processor.refund_payment(&txn_id, "damaged in transit");
    assert_eq!(refund.status, PaymentStatus::Refunded);
    assert_eq!(refund.amount, dec!(159.98));

    let again = checkout.processor.refund_payment(&txn_id, "again");
    assert_eq!(again.status, PaymentStatus::Failed);
    assert_eq!(
        checkout.processor.payment_status(&txn_id),
        Some(PaymentStatus::Refunded)
    );
}

#[test]
fn shipped_orders_cannot_be_cancelled() {
    let checkout = checkout(true);
    let (_, line) = two_headphones(&checkout, 10);

    let order = checkout.workflow.create_order(
        10,
        vec![line],
        "1 Main St".to_string(),
        PaymentMethod::Cod,
        None,
    );
    checkout
        .workflow
        .update_order_status(order.id, OrderStatus::Shipped)
        .unwrap();

    assert!(checkout.workflow.cancel_order(order.id).is_err());
    assert_eq!(checkout.workflow.order(order.id).unwrap().status, OrderStatus::Shipped);
}
