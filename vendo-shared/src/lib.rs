pub mod events;
pub mod money;

pub use events::{OrderEvent, OrderEventType, OrderItemSummary};
pub use money::round_money;
