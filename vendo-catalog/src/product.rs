use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Catalog view of a product. Total on-hand stock lives here; the
/// reservation counter lives in the inventory ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub stock: i32,
    pub is_active: bool,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_price: Decimal, stock: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            unit_price,
            stock,
            is_active: true,
        }
    }
}

/// Catalog lookup seam. Product creation and search live outside the
/// core; the inventory ledger is the only stock writer.
pub trait ProductCatalog: Send + Sync {
    fn find_product(&self, product_id: Uuid) -> Option<Product>;
    fn update_stock(&self, product_id: Uuid, stock: i32) -> bool;
    fn list_products(&self) -> Vec<Product>;
}

/// In-memory catalog store, constructed once per process and shared by
/// reference.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: Product) -> Uuid {
        let id = product.id;
        self.products.write().insert(id, product);
        id
    }

    pub fn deactivate(&self, product_id: Uuid) -> bool {
        match self.products.write().get_mut(&product_id) {
            Some(product) => {
                product.is_active = false;
                true
            }
            None => false,
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_product(&self, product_id: Uuid) -> Option<Product> {
        self.products.read().get(&product_id).cloned()
    }

    fn update_stock(&self, product_id: Uuid, stock: i32) -> bool {
        match self.products.write().get_mut(&product_id) {
            Some(product) => {
                product.stock = stock;
                true
            }
            None => false,
        }
    }

    fn list_products(&self) -> Vec<Product> {
        self.products.read().values().cloned().collect()
    }
}
