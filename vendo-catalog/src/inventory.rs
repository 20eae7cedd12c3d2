use crate::product::ProductCatalog;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use vendo_core::CoreError;

/// Tracks soft reservations against catalog stock.
///
/// The reserved map is guarded by a single mutex so that the
/// check-then-increment in `reserve_stock` is one atomic step; two
/// concurrent reservations can never both observe sufficient
/// availability when only one should succeed.
pub struct InventoryLedger {
    catalog: Arc<dyn ProductCatalog>,
    reserved: Mutex<HashMap<Uuid, i32>>,
}

impl InventoryLedger {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            reserved: Mutex::new(HashMap::new()),
        }
    }

    /// Reserve stock for a product. All-or-nothing per call: returns
    /// false without mutation when the quantity is non-positive or
    /// availability is insufficient.
    pub fn reserve_stock(&self, product_id: Uuid, quantity: i32) -> Result<bool, InventoryError> {
        if quantity <= 0 {
            warn!("Invalid reservation quantity {} for product {}", quantity, product_id);
            return Ok(false);
        }

        let mut reserved = self.reserved.lock();
        let product = self
            .catalog
            .find_product(product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;

        let already_reserved = reserved.get(&product_id).copied().unwrap_or(0);
        let available = product.stock - already_reserved;
        if available < quantity {
            warn!(
                "Insufficient stock for product {}: available={}, requested={}",
                product_id, available, quantity
            );
            return Ok(false);
        }

        let total = already_reserved + quantity;
        reserved.insert(product_id, total);
        info!("Reserved {} units of product {}. Total reserved: {}", quantity, product_id, total);
        Ok(true)
    }

    /// Release previously reserved stock, floored at zero. A no-op when
    /// nothing is reserved.
    pub fn release_stock(&self, product_id: Uuid, quantity: i32) {
        let mut reserved = self.reserved.lock();
        let remaining = Self::release_entry(&mut reserved, product_id, quantity);
        match remaining {
            Some(remaining) => {
                info!("Released {} units of product {}. Remaining reserved: {}", quantity, product_id, remaining)
            }
            None => debug!("No reserved stock to release for product {}", product_id),
        }
    }

    /// Permanently reduce total stock, releasing the same quantity from
    /// the reservation counter.
    pub fn confirm_stock_reduction(
        &self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), InventoryError> {
        let mut reserved = self.reserved.lock();
        let product = self
            .catalog
            .find_product(product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;

        let new_stock = product.stock - quantity;
        if new_stock < 0 {
            error!(
                "Stock would go negative for product {}: current={}, reduce={}",
                product_id, product.stock, quantity
            );
            return Err(InventoryError::StockUnderflow {
                product_id,
                stock: product.stock,
                requested: quantity,
            });
        }

        self.catalog.update_stock(product_id, new_stock);
        Self::release_entry(&mut reserved, product_id, quantity);
        info!("Stock confirmed for product {}: {} -> {}", product_id, product.stock, new_stock);
        Ok(())
    }

    /// Stock available for new reservations: `max(0, stock - reserved)`.
    pub fn available_stock(&self, product_id: Uuid) -> Result<i32, InventoryError> {
        let product = self
            .catalog
            .find_product(product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;
        let reserved = self.reserved.lock().get(&product_id).copied().unwrap_or(0);
        Ok((product.stock - reserved).max(0))
    }

    pub fn is_in_stock(&self, product_id: Uuid, quantity: i32) -> Result<bool, InventoryError> {
        Ok(self.available_stock(product_id)? >= quantity)
    }

    /// Active products whose total stock is at or below the threshold.
    pub fn low_stock_products(&self, threshold: i32) -> Vec<Uuid> {
        self.catalog
            .list_products()
            .into_iter()
            .filter(|p| p.is_active && p.stock <= threshold)
            .map(|p| p.id)
            .collect()
    }

    /// Bulk availability read. Unknown products map to 0 instead of
    /// propagating a not-found fault.
    pub fn bulk_stock_levels(&self, product_ids: &[Uuid]) -> HashMap<Uuid, i32> {
        let mut levels = HashMap::new();
        for &product_id in product_ids {
            match self.available_stock(product_id) {
                Ok(available) => {
                    levels.insert(product_id, available);
                }
                Err(_) => {
                    warn!("Product {} not found during bulk stock check", product_id);
                    levels.insert(product_id, 0);
                }
            }
        }
        levels
    }

    fn release_entry(
        reserved: &mut HashMap<Uuid, i32>,
        product_id: Uuid,
        quantity: i32,
    ) -> Option<i32> {
        let current = reserved.get(&product_id).copied().unwrap_or(0);
        if current == 0 {
            return None;
        }
        let remaining = (current - quantity).max(0);
        if remaining == 0 {
            reserved.remove(&product_id);
        } else {
            reserved.insert(product_id, remaining);
        }
        Some(remaining)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Cannot reduce stock below zero for product {product_id}: current={stock}, requested={requested}")]
    StockUnderflow {
        product_id: Uuid,
        stock: i32,
        requested: i32,
    },
}

impl From<InventoryError> for CoreError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(_) => CoreError::NotFound(err.to_string()),
            InventoryError::StockUnderflow { .. } => CoreError::InvalidState(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{InMemoryCatalog, Product};
    use rust_decimal_macros::dec;

    fn ledger_with_product(stock: i32) -> (InventoryLedger, Uuid) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let id = catalog.insert(Product::new("Wireless Headphones", dec!(79.99), stock));
        (InventoryLedger::new(catalog), id)
    }

    #[test]
    fn test_reservation_lifecycle() {
        let (ledger, id) = ledger_with_product(10);

        assert!(ledger.reserve_stock(id, 4).unwrap());
        assert_eq!(ledger.available_stock(id).unwrap(), 6);

        ledger.release_stock(id, 4);
        assert_eq!(ledger.available_stock(id).unwrap(), 10);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let (ledger, id) = ledger_with_product(10);
        assert!(!ledger.reserve_stock(id, 0).unwrap());
        assert!(!ledger.reserve_stock(id, -3).unwrap());
        assert_eq!(ledger.available_stock(id).unwrap(), 10);
    }

    #[test]
    fn test_insufficient_stock_is_all_or_nothing() {
        let (ledger, id) = ledger_with_product(5);
        assert!(ledger.reserve_stock(id, 3).unwrap());
        assert!(!ledger.reserve_stock(id, 3).unwrap());
        // Failed call must not have partially reserved anything
        assert_eq!(ledger.available_stock(id).unwrap(), 2);
    }

    #[test]
    fn test_release_floors_at_zero() {
        let (ledger, id) = ledger_with_product(10);
        assert!(ledger.reserve_stock(id, 2).unwrap());
        ledger.release_stock(id, 100);
        assert_eq!(ledger.available_stock(id).unwrap(), 10);
        // Releasing with nothing reserved is a no-op, not an error
        ledger.release_stock(id, 1);
        assert_eq!(ledger.available_stock(id).unwrap(), 10);
    }

    #[test]
    fn test_confirm_reduces_total_and_reservation() {
        let (ledger, id) = ledger_with_product(10);
        assert!(ledger.reserve_stock(id, 4).unwrap());
        ledger.confirm_stock_reduction(id, 4).unwrap();
        // Total stock dropped permanently, reservation fully released
        assert_eq!(ledger.available_stock(id).unwrap(), 6);
    }

    #[test]
    fn test_confirm_underflow_fails() {
        let (ledger, id) = ledger_with_product(3);
        let err = ledger.confirm_stock_reduction(id, 5).unwrap_err();
        assert!(matches!(err, InventoryError::StockUnderflow { .. }));
        assert_eq!(ledger.available_stock(id).unwrap(), 3);
    }

    #[test]
    fn test_unknown_product_is_a_fault() {
        let (ledger, _) = ledger_with_product(3);
        let err = ledger.reserve_stock(Uuid::new_v4(), 1).unwrap_err();
        assert!(matches!(err, InventoryError::ProductNotFound(_)));
    }

    #[test]
    fn test_bulk_levels_lenient_on_unknown() {
        let (ledger, id) = ledger_with_product(7);
        let ghost = Uuid::new_v4();
        let levels = ledger.bulk_stock_levels(&[id, ghost]);
        assert_eq!(levels[&id], 7);
        assert_eq!(levels[&ghost], 0);
    }

    #[test]
    fn test_low_stock_skips_inactive_products() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let low = catalog.insert(Product::new("Low", dec!(1.00), 2));
        let inactive = catalog.insert(Product::new("Inactive", dec!(1.00), 1));
        let high = catalog.insert(Product::new("High", dec!(1.00), 50));
        catalog.deactivate(inactive);

        let ledger = InventoryLedger::new(catalog);
        let ids = ledger.low_stock_products(5);
        assert!(ids.contains(&low));
        assert!(!ids.contains(&inactive));
        assert!(!ids.contains(&high));
    }

    #[test]
    fn test_concurrent_reservations_never_oversell() {
        let (ledger, id) = ledger_with_product(5);
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.reserve_stock(id, 1).unwrap())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&reserved| reserved)
            .count();

        // Exactly min(N, S) reservations may win
        assert_eq!(successes, 5);
        assert_eq!(ledger.available_stock(id).unwrap(), 0);
    }
}
