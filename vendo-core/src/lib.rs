pub mod events;
pub mod payment;

pub use events::{EventSink, MemoryEventSink};
pub use payment::{PaymentMethod, PaymentStatus, SettlementGateway};

/// Workspace-level error taxonomy.
///
/// Per-crate errors map into these categories; expected business
/// outcomes (declined payments, inapplicable coupons) are reported as
/// negative results instead and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
