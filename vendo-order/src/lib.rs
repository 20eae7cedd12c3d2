pub mod export;
pub mod models;
pub mod shipping;
pub mod store;
pub mod tracking;
pub mod workflow;

pub use export::OrderCsvExporter;
pub use models::{NewLineItem, Order, OrderItem, OrderStatus};
pub use shipping::ShippingCalculator;
pub use store::{InMemoryOrderStore, OrderStore};
pub use tracking::OrderTracker;
pub use workflow::{OrderError, OrderWorkflow};
