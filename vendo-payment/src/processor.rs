use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use vendo_core::{CoreResult, PaymentMethod, PaymentStatus, SettlementGateway};

/// Recorded outcome of a payment or refund attempt.
///
/// Validation failures come back as FAILED records with no transaction
/// id and are never stored; callers inspect `status` rather than
/// handling errors for expected declines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub transaction_id: Option<String>,
    pub order_id: Option<Uuid>,
    pub amount: Decimal,
    pub method: Option<PaymentMethod>,
    pub status: PaymentStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    fn failed(
        order_id: Option<Uuid>,
        amount: Decimal,
        method: Option<PaymentMethod>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: None,
            order_id,
            amount,
            method,
            status: PaymentStatus::Failed,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Callback seam into the order workflow: after a successful charge the
/// processor requests the order be transitioned to CONFIRMED.
pub trait ConfirmOrder: Send + Sync {
    fn confirm_order(&self, order_id: Uuid) -> CoreResult<()>;
}

#[derive(Default)]
struct TransactionStore {
    transactions: HashMap<String, PaymentRecord>,
    by_order: HashMap<Uuid, Vec<String>>,
}

/// Simulates a payment-gateway round trip and records transactions.
pub struct PaymentProcessor {
    gateway: Arc<dyn SettlementGateway>,
    confirmer: Arc<dyn ConfirmOrder>,
    store: Mutex<TransactionStore>,
}

impl PaymentProcessor {
    pub fn new(gateway: Arc<dyn SettlementGateway>, confirmer: Arc<dyn ConfirmOrder>) -> Self {
        Self {
            gateway,
            confirmer,
            store: Mutex::new(TransactionStore::default()),
        }
    }

    /// Attempt settlement for an order. Invalid input yields a FAILED
    /// result with no recorded transaction; a settled charge is recorded
    /// and the order workflow is asked to confirm the order.
    pub fn process_payment(&self, order_id: Uuid, amount: Decimal, method: &str) -> PaymentRecord {
        if amount <= Decimal::ZERO {
            warn!("Invalid payment amount {} for order {}", amount, order_id);
            return PaymentRecord::failed(
                Some(order_id),
                amount,
                PaymentMethod::parse(method),
                "Payment amount must be positive",
            );
        }

        let method = match PaymentMethod::parse(method) {
            Some(method) => method,
            None => {
                warn!("Unsupported payment method '{}' for order {}", method, order_id);
                return PaymentRecord::failed(
                    Some(order_id),
                    amount,
                    None,
                    format!("Unsupported payment method: {}", method),
                );
            }
        };

        let transaction_id = generate_transaction_id();
        info!(
            "Processing payment: orderId={}, amount={}, method={}, txnId={}",
            order_id,
            amount,
            method.as_str(),
            transaction_id
        );

        let success = self.gateway.settle(method, amount);
        let record = PaymentRecord {
            transaction_id: Some(transaction_id.clone()),
            order_id: Some(order_id),
            amount,
            method: Some(method),
            status: if success { PaymentStatus::Completed } else { PaymentStatus::Failed },
            message: if success {
                "Payment processed successfully".to_string()
            } else {
                "Payment gateway declined".to_string()
            },
            created_at: Utc::now(),
        };

        {
            // Insert and index in one critical section so concurrent
            // callers cannot lose entries
            let mut store = self.store.lock();
            store.transactions.insert(transaction_id.clone(), record.clone());
            store.by_order.entry(order_id).or_default().push(transaction_id);
        }

        if success {
            // The charge stays COMPLETED even if confirmation fails; the
            // discrepancy is logged for out-of-band reconciliation
            if let Err(e) = self.confirmer.confirm_order(order_id) {
                error!("Failed to update order status for order {}: {}", order_id, e);
            } else {
                info!("Order {} status updated to CONFIRMED after payment", order_id);
            }
        }

        record
    }

    /// Refund a completed transaction. Creates a new linked REFUNDED
    /// record and flips the original; a transaction can be refunded at
    /// most once.
    pub fn refund_payment(&self, transaction_id: &str, reason: &str) -> PaymentRecord {
        let mut store = self.store.lock();

        let original = match store.transactions.get(transaction_id) {
            Some(original) => original.clone(),
            None => {
                warn!("Transaction {} not found for refund", transaction_id);
                return PaymentRecord::failed(
                    None,
                    Decimal::ZERO,
                    None,
                    "Original transaction not found",
                );
            }
        };

        if original.status != PaymentStatus::Completed {
            warn!(
                "Cannot refund transaction {} with status {:?}",
                transaction_id, original.status
            );
            return PaymentRecord::failed(
                original.order_id,
                original.amount,
                original.method,
                "Can only refund completed transactions",
            );
        }

        let refund_id = format!("REF_{}", generate_transaction_id());
        let refund = PaymentRecord {
            transaction_id: Some(refund_id.clone()),
            order_id: original.order_id,
            amount: original.amount,
            method: original.method,
            status: PaymentStatus::Refunded,
            message: format!("Refund processed. Reason: {}", reason),
            created_at: Utc::now(),
        };

        if let Some(original) = store.transactions.get_mut(transaction_id) {
            original.status = PaymentStatus::Refunded;
        }
        store.transactions.insert(refund_id.clone(), refund.clone());

        info!(
            "Refund {} issued for original transaction {}. Reason: {}",
            refund_id, transaction_id, reason
        );
        refund
    }

    /// Status of a recorded transaction; None for unknown ids.
    pub fn payment_status(&self, transaction_id: &str) -> Option<PaymentStatus> {
        self.store
            .lock()
            .transactions
            .get(transaction_id)
            .map(|record| record.status)
    }

    /// Transactions recorded for an order, in the order they were made.
    pub fn payments_by_order(&self, order_id: Uuid) -> Vec<PaymentRecord> {
        let store = self.store.lock();
        store
            .by_order
            .get(&order_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| store.transactions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_valid_payment_method(&self, method: &str) -> bool {
        PaymentMethod::parse(method).is_some()
    }
}

/// Timestamp plus random suffix, collision-resistant under concurrent
/// callers.
fn generate_transaction_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("TXN_{}_{}", timestamp, &suffix[..6])
}
