//! Recalculation of the running total.
//!
//! Charges are applied in a fixed order: plan, light discount, coupon,
//! payment fee. The coupon works on the subtotal of the first two only.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::model::{Charges, Coupon, FormState, LineItem, Yen};

pub const LIGHT_DISCOUNT_LABEL: &str = "light discount";
pub const REFERRAL_DISCOUNT_LABEL: &str = "referral discount";
pub const CONVENIENCE_STORE_FEE_LABEL: &str = "convenience store fee";

pub const REFERRAL_DISCOUNT: Yen = 500;
pub const CONVENIENCE_STORE_FEE: Yen = 220;

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?)([0-9]+)").expect("static regex"));

pub fn compute_charges(state: &FormState) -> Charges {
    let mut items = Vec::new();
    let mut subtotal: Yen = 0;

    if let Some(plan) = &state.selected_plan {
        subtotal += plan.base_price;
        items.push(LineItem::new(plan.label.clone(), plan.base_price));

        if state.light_discount_agreed {
            subtotal += plan.light_discount_price;
            items.push(LineItem::new(LIGHT_DISCOUNT_LABEL, plan.light_discount_price));
        }
    }

    let mut total = subtotal;
    match state.coupon {
        Some(Coupon::Referral) => {
            total -= REFERRAL_DISCOUNT;
            items.push(LineItem::new(REFERRAL_DISCOUNT_LABEL, -REFERRAL_DISCOUNT));
        }
        Some(Coupon::Percent(percent)) => {
            if let Some(discount) = percent_discount(subtotal, percent) {
                total -= discount;
                items.push(LineItem::new(format!("{percent}% off coupon"), -discount));
            }
        }
        Some(Coupon::Unused) | None => {}
    }

    if state
        .payment_method
        .as_ref()
        .is_some_and(|m| m.is_convenience_store())
    {
        total += CONVENIENCE_STORE_FEE;
        items.push(LineItem::new(CONVENIENCE_STORE_FEE_LABEL, CONVENIENCE_STORE_FEE));
    }

    debug!(subtotal, total, lines = items.len(), "recalculated charges");
    Charges { items, subtotal, total }
}

/// Discount for a percentage coupon, or `None` when the percentage is
/// outside 1..=99.
///
/// Rounds half up (toward +infinity) in exact integer arithmetic:
/// `floor((subtotal * percent + 50) / 100)`.
pub fn percent_discount(subtotal: Yen, percent: i64) -> Option<Yen> {
    if percent <= 0 || percent >= 100 {
        return None;
    }
    let scaled = i128::from(subtotal) * i128::from(percent) + 50;
    // |result| never exceeds |subtotal|, so it fits back into i64.
    Some(scaled.div_euclid(100) as Yen)
}

/// Reads the leading integer out of free-form percent input.
///
/// Leading whitespace and a sign are accepted, trailing garbage is ignored,
/// and input without leading digits is 0. Only ASCII digits count, so a
/// full-width digit ends the number. Out-of-range digit runs saturate.
pub fn parse_percent(raw: &str) -> i64 {
    let Some(caps) = LEADING_INT.captures(raw) else {
        return 0;
    };
    let negative = &caps[1] == "-";
    match caps[2].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}
