use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole yen. Every price, discount and total in the form uses this.
pub type Yen = i64;

/// Payment value that carries the convenience-store fee.
pub const CONVENIENCE_STORE_PAYMENT: &str = "コンビニ払い";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlanOption {
    pub id: String,
    pub label: String,
    pub base_price: Yen,
    pub light_discount_price: Yen, // zero or negative
}

impl fmt::Display for PlanOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, crate::summary::format_yen(self.base_price))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    pub value: String, // submitted value, matched against CONVENIENCE_STORE_PAYMENT
    pub label: String, // text shown to the user and in the summary
}

impl PaymentMethod {
    pub fn is_convenience_store(&self) -> bool {
        self.value == CONVENIENCE_STORE_PAYMENT
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// The coupon radio group. `Unused` is the explicit "no coupon" answer,
/// which is different from not answering at all (`FormState::coupon == None`).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", content = "percent", rename_all = "snake_case")]
pub enum Coupon {
    Unused,
    Referral,
    /// Raw percentage as typed. Only 1..=99 discounts anything.
    Percent(i64),
}

/// Immutable snapshot of the form, rebuilt before every recalculation.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub requester_name: String,
    pub selected_plan: Option<PlanOption>,
    pub light_discount_agreed: bool,
    pub coupon: Option<Coupon>,
    pub payment_method: Option<PaymentMethod>,
    pub remarks: String,
    pub all_agreements_checked: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub label: String,
    pub amount: Yen,
}

impl LineItem {
    pub fn new(label: impl Into<String>, amount: Yen) -> Self {
        Self { label: label.into(), amount }
    }
}

/// Output of the pricing engine. `items` are in application order.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Charges {
    pub items: Vec<LineItem>,
    pub subtotal: Yen, // plan + light discount, before coupon
    pub total: Yen,
}
