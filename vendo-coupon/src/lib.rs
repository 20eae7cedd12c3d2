pub mod ledger;

pub use ledger::{Coupon, CouponLedger, DiscountKind};
