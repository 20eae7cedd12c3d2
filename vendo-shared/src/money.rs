use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to 2 fractional digits, half-up.
///
/// All amounts in the system are positive, so midpoint-away-from-zero
/// matches the half-up convention used for totals and discounts.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
