use rand::Rng;
use rust_decimal::Decimal;
use vendo_core::{PaymentMethod, SettlementGateway};

/// Stand-in for a real gateway round trip.
///
/// COD always clears. Other methods clear deterministically below the
/// large-amount threshold; at or above it the charge is declined with
/// the configured probability.
pub struct SimulatedGateway {
    large_amount_threshold: Decimal,
    decline_rate: f64,
}

impl SimulatedGateway {
    pub fn new(large_amount_threshold: Decimal, decline_rate: f64) -> Self {
        Self {
            large_amount_threshold,
            decline_rate,
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Decimal::from(10_000), 0.1)
    }
}

impl SettlementGateway for SimulatedGateway {
    fn settle(&self, method: PaymentMethod, amount: Decimal) -> bool {
        if method == PaymentMethod::Cod {
            return true;
        }
        if amount < self.large_amount_threshold {
            return true;
        }
        rand::thread_rng().gen_bool(1.0 - self.decline_rate)
    }
}

/// Gateway with a fixed outcome, for deterministic tests.
pub struct FixedOutcomeGateway {
    pub succeed: bool,
}

impl SettlementGateway for FixedOutcomeGateway {
    fn settle(&self, _method: PaymentMethod, _amount: Decimal) -> bool {
        self.succeed
    }
}
