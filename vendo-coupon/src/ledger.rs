use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use vendo_shared::round_money;

/// Promotional discount kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

impl DiscountKind {
    /// Parse a kind string. Returns None for anything outside the two
    /// enumerated kinds, so unknown kinds fail at the edge.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PERCENTAGE" => Some(Self::Percentage),
            "FIXED_AMOUNT" => Some(Self::FixedAmount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub kind: DiscountKind,
    pub value: Decimal,
    pub min_order_amount: Decimal,
    pub max_uses: u32,
    pub used_count: u32,
    pub active: bool,
}

impl Coupon {
    fn is_redeemable(&self) -> bool {
        self.active && self.used_count < self.max_uses
    }

    fn discount_for(&self, order_total: Decimal) -> Decimal {
        match self.kind {
            DiscountKind::Percentage => {
                round_money(order_total * self.value / Decimal::ONE_HUNDRED)
            }
            DiscountKind::FixedAmount => self.value.min(order_total),
        }
    }
}

/// Validates and applies promotional discounts.
///
/// A single mutex guards the store so that the redemption-count
/// increment in `apply_coupon` is atomic relative to concurrent
/// applications of the same code.
#[derive(Default)]
pub struct CouponLedger {
    coupons: Mutex<HashMap<String, Coupon>>,
}

impl CouponLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coupon. Returns false without mutation when the code is
    /// blank or already exists, or a percentage value exceeds 100.
    pub fn create_coupon(
        &self,
        code: &str,
        kind: DiscountKind,
        value: Decimal,
        min_order_amount: Decimal,
        max_uses: u32,
    ) -> bool {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            warn!("Cannot create coupon with a blank code");
            return false;
        }

        if kind == DiscountKind::Percentage && value > Decimal::ONE_HUNDRED {
            warn!("Percentage discount cannot exceed 100%");
            return false;
        }

        let mut coupons = self.coupons.lock();
        if coupons.contains_key(&normalized) {
            warn!("Coupon {} already exists", normalized);
            return false;
        }

        info!(
            "Coupon created: code={}, kind={:?}, value={}, minOrder={}, maxUses={}",
            normalized, kind, value, min_order_amount, max_uses
        );
        coupons.insert(
            normalized.clone(),
            Coupon {
                code: normalized,
                kind,
                value,
                min_order_amount,
                max_uses,
                used_count: 0,
                active: true,
            },
        );
        true
    }

    /// Whether a code exists, is active, and has redemptions remaining.
    pub fn is_valid_coupon(&self, code: &str) -> bool {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return false;
        }

        match self.coupons.lock().get(&normalized) {
            None => {
                debug!("Coupon {} not found", normalized);
                false
            }
            Some(coupon) if !coupon.active => {
                debug!("Coupon {} is inactive", normalized);
                false
            }
            Some(coupon) if coupon.used_count >= coupon.max_uses => {
                debug!(
                    "Coupon {} has reached max uses ({}/{})",
                    normalized, coupon.used_count, coupon.max_uses
                );
                false
            }
            Some(_) => true,
        }
    }

    /// Apply a coupon to an order total. Invalid or inapplicable codes
    /// pass the total through unchanged with no redemption recorded;
    /// callers never see an error for an expected business outcome.
    pub fn apply_coupon(&self, code: &str, order_total: Decimal) -> Decimal {
        let normalized = code.trim().to_uppercase();
        let mut coupons = self.coupons.lock();

        let coupon = match coupons.get_mut(&normalized) {
            Some(coupon) if coupon.is_redeemable() => coupon,
            _ => {
                warn!("Attempt to apply invalid coupon: {}", code);
                return order_total;
            }
        };

        if order_total < coupon.min_order_amount {
            info!(
                "Order total {} below minimum {} for coupon {}",
                order_total, coupon.min_order_amount, normalized
            );
            return order_total;
        }

        let discount = coupon.discount_for(order_total);
        let discounted_total = round_money((order_total - discount).max(Decimal::ZERO));
        coupon.used_count += 1;

        info!(
            "Coupon {} applied: original={}, discount={}, final={}",
            normalized, order_total, discount, discounted_total
        );
        discounted_total
    }

    /// Preview the discount a code would yield, without redeeming it.
    pub fn discount_amount(&self, code: &str, order_total: Decimal) -> Decimal {
        let normalized = code.trim().to_uppercase();
        match self.coupons.lock().get(&normalized) {
            Some(coupon) if coupon.is_redeemable() && order_total >= coupon.min_order_amount => {
                coupon.discount_for(order_total)
            }
            _ => Decimal::ZERO,
        }
    }

    /// Deactivate a coupon (one-way). Returns false for unknown codes.
    pub fn deactivate_coupon(&self, code: &str) -> bool {
        let normalized = code.trim().to_uppercase();
        match self.coupons.lock().get_mut(&normalized) {
            Some(coupon) => {
                coupon.active = false;
                info!("Coupon {} deactivated", normalized);
                true
            }
            None => {
                warn!("Cannot deactivate non-existent coupon: {}", code);
                false
            }
        }
    }

    /// Codes that are active and still have redemptions remaining.
    pub fn active_coupons(&self) -> Vec<String> {
        self.coupons
            .lock()
            .values()
            .filter(|c| c.is_redeemable())
            .map(|c| c.code.clone())
            .collect()
    }
}
