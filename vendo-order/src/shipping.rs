use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingMethod {
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    /// Base rate per kg
    fn base_rate(&self) -> Decimal {
        match self {
            Self::Standard => Decimal::from(15_000),
            Self::Express => Decimal::from(30_000),
            Self::Overnight => Decimal::from(50_000),
        }
    }

    fn base_delivery_days(&self) -> i64 {
        match self {
            Self::Standard => 5,
            Self::Express => 2,
            Self::Overnight => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingZone {
    Local,
    Regional,
    National,
    Remote,
}

impl ShippingZone {
    fn multiplier(&self) -> Decimal {
        match self {
            Self::Local => Decimal::new(10, 1),
            Self::Regional => Decimal::new(15, 1),
            Self::National => Decimal::new(20, 1),
            Self::Remote => Decimal::new(30, 1),
        }
    }

    fn delivery_adjustment_days(&self) -> i64 {
        match self {
            Self::Local => 0,
            Self::Regional => 1,
            Self::National => 2,
            Self::Remote => 4,
        }
    }
}

/// Shipping cost calculator: weight times a per-method base rate and a
/// zone multiplier, with free standard shipping above a threshold and a
/// surcharge for heavy packages.
pub struct ShippingCalculator {
    free_shipping_threshold: Decimal,
}

impl ShippingCalculator {
    pub fn new(free_shipping_threshold: Decimal) -> Self {
        Self {
            free_shipping_threshold,
        }
    }

    pub fn calculate(
        &self,
        weight_kg: f64,
        method: ShippingMethod,
        zone: ShippingZone,
        order_total: Decimal,
    ) -> Decimal {
        if weight_kg <= 0.0 {
            warn!("Invalid weight: {}kg", weight_kg);
            return Decimal::ZERO;
        }

        if method == ShippingMethod::Standard && order_total >= self.free_shipping_threshold {
            info!("Free shipping applied for order total {}", order_total);
            return Decimal::ZERO;
        }

        let weight = Decimal::from_f64(weight_kg.max(0.5)).unwrap_or(Decimal::ONE);
        let mut cost = ceil_whole(method.base_rate() * weight * zone.multiplier());

        // Heavy packages over 30kg carry a 20% surcharge
        if weight_kg > 30.0 {
            let surcharge = ceil_whole(cost * Decimal::new(2, 1));
            cost += surcharge;
            debug!("Heavy package surcharge applied: +{}", surcharge);
        }

        info!(
            "Shipping calculated: weight={}kg, method={:?}, zone={:?}, cost={}",
            weight_kg, method, zone, cost
        );
        cost
    }

    /// Estimated business days in transit: the method's base transit
    /// time plus a per-zone adjustment.
    pub fn estimated_delivery_days(&self, method: ShippingMethod, zone: ShippingZone) -> i64 {
        method.base_delivery_days() + zone.delivery_adjustment_days()
    }
}

impl Default for ShippingCalculator {
    fn default() -> Self {
        Self::new(Decimal::from(500_000))
    }
}

fn ceil_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::AwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_weight_costs_nothing() {
        let calc = ShippingCalculator::default();
        assert_eq!(
            calc.calculate(0.0, ShippingMethod::Standard, ShippingZone::Local, dec!(100)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_free_standard_shipping_above_threshold() {
        let calc = ShippingCalculator::default();
        assert_eq!(
            calc.calculate(2.0, ShippingMethod::Standard, ShippingZone::Remote, dec!(500000)),
            Decimal::ZERO
        );
        // Express never ships free
        assert!(
            calc.calculate(2.0, ShippingMethod::Express, ShippingZone::Local, dec!(500000))
                > Decimal::ZERO
        );
    }

    #[test]
    fn test_base_rate_and_zone_multiplier() {
        let calc = ShippingCalculator::default();
        // 2kg standard national: 15000 * 2 * 2.0
        assert_eq!(
            calc.calculate(2.0, ShippingMethod::Standard, ShippingZone::National, dec!(100)),
            dec!(60000)
        );
    }

    #[test]
    fn test_minimum_billable_weight() {
        let calc = ShippingCalculator::default();
        // Anything under half a kilo bills as 0.5kg
        assert_eq!(
            calc.calculate(0.1, ShippingMethod::Standard, ShippingZone::Local, dec!(100)),
            dec!(7500)
        );
    }

    #[test]
    fn test_estimated_delivery_days_adds_zone_adjustment() {
        let calc = ShippingCalculator::default();
        assert_eq!(
            calc.estimated_delivery_days(ShippingMethod::Overnight, ShippingZone::Local),
            1
        );
        assert_eq!(
            calc.estimated_delivery_days(ShippingMethod::Express, ShippingZone::National),
            4
        );
        assert_eq!(
            calc.estimated_delivery_days(ShippingMethod::Standard, ShippingZone::Remote),
            9
        );
    }

    #[test]
    fn test_heavy_package_surcharge() {
        let calc = ShippingCalculator::default();
        // 31kg express local: 30000 * 31 = 930000, plus 20% surcharge
        assert_eq!(
            calc.calculate(31.0, ShippingMethod::Express, ShippingZone::Local, dec!(100)),
            dec!(1116000)
        );
    }
}
