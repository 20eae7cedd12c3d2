pub mod gateway;
pub mod processor;

pub use gateway::{FixedOutcomeGateway, SimulatedGateway};
pub use processor::{ConfirmOrder, PaymentProcessor, PaymentRecord};
