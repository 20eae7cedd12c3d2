use crate::models::{Order, OrderStatus};
use crate::store::OrderStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

const CSV_HEADER: &str =
    "OrderID,UserID,Status,TotalAmount,PaymentMethod,ShippingAddress,OrderDate,ItemCount";
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const DATE_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Read-only CSV export over persisted orders, for reporting and
/// bookkeeping. Output is UTF-8 with a byte-order mark for spreadsheet
/// compatibility.
pub struct OrderCsvExporter {
    store: Arc<dyn OrderStore>,
}

impl OrderCsvExporter {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub fn export_all(&self) -> Vec<u8> {
        let orders = self.store.find_all();
        info!("Exporting {} orders to CSV", orders.len());
        generate_csv(&orders)
    }

    pub fn export_by_user(&self, user_id: i64) -> Vec<u8> {
        let orders = self.store.find_by_user(user_id);
        info!("Exporting {} orders for user {} to CSV", orders.len(), user_id);
        generate_csv(&orders)
    }

    pub fn export_by_status(&self, status: OrderStatus) -> Vec<u8> {
        let orders = self.store.find_by_status(status);
        info!("Exporting {} orders with status {} to CSV", orders.len(), status.as_str());
        generate_csv(&orders)
    }

    pub fn export_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<u8> {
        let orders = self.store.find_by_date_range(start, end);
        info!("Exporting {} orders between {} and {} to CSV", orders.len(), start, end);
        generate_csv(&orders)
    }

    /// Revenue summary as `Metric,Value` rows. Cancelled and refunded
    /// orders do not count toward revenue.
    pub fn export_revenue_summary(&self) -> Vec<u8> {
        let orders = self.store.find_all();

        let total_revenue: Decimal = orders
            .iter()
            .filter(|o| !matches!(o.status, OrderStatus::Cancelled | OrderStatus::Refunded))
            .map(|o| o.total_amount)
            .sum();
        let completed = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .count();

        let mut out = String::new();
        out.push_str("Metric,Value\n");
        out.push_str(&format!("TotalOrders,{}\n", orders.len()));
        out.push_str(&format!("CompletedOrders,{}\n", completed));
        out.push_str(&format!("TotalRevenue,{}\n", total_revenue));

        info!("Revenue summary exported: {} orders, revenue={}", orders.len(), total_revenue);
        out.into_bytes()
    }
}

fn generate_csv(orders: &[Order]) -> Vec<u8> {
    let mut out = Vec::from(UTF8_BOM);
    out.extend_from_slice(CSV_HEADER.as_bytes());
    out.push(b'\n');

    for order in orders {
        let line = [
            order.id.to_string(),
            order.user_id.to_string(),
            order.status.as_str().to_string(),
            order.total_amount.to_string(),
            escape_csv(order.payment_method.as_str()),
            escape_csv(&order.shipping_address),
            order.order_date.format(DATE_FMT).to_string(),
            order.items.len().to_string(),
        ]
        .join(",");
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }

    out
}

/// Fields containing a comma, quote, or newline are quoted with
/// internal quotes doubled.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
