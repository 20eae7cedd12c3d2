pub mod inventory;
pub mod product;

pub use inventory::{InventoryError, InventoryLedger};
pub use product::{InMemoryCatalog, Product, ProductCatalog};
