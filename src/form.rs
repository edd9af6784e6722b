//! Building `FormState` snapshots: from command-line flags, from the reset
//! defaults, or by walking the user through the form in the terminal.

use clap::ValueEnum;
use inquire::{Confirm, Select, Text};
use std::fmt;
use tracing::debug;

use crate::config::Catalog;
use crate::error::OrderError;
use crate::model::{Coupon, FormState, PaymentMethod};
use crate::pricing::{compute_charges, parse_percent};
use crate::summary::charges_table;

/// Coupon radio button, before the percentage is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CouponKind {
    #[value(name = "none")]
    Unused,
    Referral,
    Percent,
}

impl CouponKind {
    pub fn with_percent(self, raw_percent: Option<&str>) -> Coupon {
        match self {
            CouponKind::Unused => Coupon::Unused,
            CouponKind::Referral => Coupon::Referral,
            CouponKind::Percent => Coupon::Percent(parse_percent(raw_percent.unwrap_or(""))),
        }
    }
}

impl fmt::Display for CouponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CouponKind::Unused => "No coupon",
            CouponKind::Referral => "Referral (-¥500)",
            CouponKind::Percent => "Percent-off coupon",
        })
    }
}

/// One entry of the payment select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentChoice {
    NotSelected,
    Method(PaymentMethod),
}

impl PaymentChoice {
    /// "(not selected)" first, then the catalog methods in order.
    pub fn options(catalog: &Catalog) -> Vec<PaymentChoice> {
        std::iter::once(PaymentChoice::NotSelected)
            .chain(catalog.payment_methods.iter().cloned().map(PaymentChoice::Method))
            .collect()
    }

    pub fn into_method(self) -> Option<PaymentMethod> {
        match self {
            PaymentChoice::NotSelected => None,
            PaymentChoice::Method(method) => Some(method),
        }
    }
}

impl fmt::Display for PaymentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentChoice::NotSelected => f.write_str("(not selected)"),
            PaymentChoice::Method(method) => fmt::Display::fmt(method, f),
        }
    }
}

/// Raw form values as they arrive from flags, keyed by catalog ids.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub requester_name: String,
    pub plan: Option<String>,
    pub light_discount: bool,
    pub coupon: Option<CouponKind>,
    pub percent: Option<String>,
    pub payment_method: Option<String>,
    pub remarks: String,
    pub agreed: bool,
}

/// Resolves catalog references in `input`. Unknown plan or payment keys are
/// errors; anything merely missing is left for validation to report.
pub fn build_state(catalog: &Catalog, input: &FormInput) -> Result<FormState, OrderError> {
    let selected_plan = match &input.plan {
        Some(id) => Some(
            catalog
                .plan(id)
                .cloned()
                .ok_or_else(|| OrderError::UnknownPlan(id.clone()))?,
        ),
        None => None,
    };
    let payment_method = match &input.payment_method {
        Some(key) => Some(
            catalog
                .payment_method(key)
                .cloned()
                .ok_or_else(|| OrderError::UnknownPaymentMethod(key.clone()))?,
        ),
        None => None,
    };

    Ok(FormState {
        requester_name: input.requester_name.clone(),
        selected_plan,
        light_discount_agreed: input.light_discount,
        coupon: input.coupon.map(|kind| kind.with_percent(input.percent.as_deref())),
        payment_method,
        remarks: input.remarks.clone(),
        all_agreements_checked: input.agreed,
    })
}

/// A cleared form: default plan selected, "no coupon" chosen, everything
/// else empty.
pub fn reset_form(catalog: &Catalog) -> FormState {
    FormState {
        selected_plan: catalog.default_plan().cloned(),
        coupon: Some(Coupon::Unused),
        ..FormState::default()
    }
}

fn show_running_total(state: &FormState) {
    let charges = compute_charges(state);
    println!("{}", charges_table(&charges));
}

/// Walks the user through the form, starting from the reset defaults and
/// reprinting the running total after every priced choice.
pub fn prompt_form(catalog: &Catalog) -> Result<FormState, OrderError> {
    let mut state = reset_form(catalog);
    println!("\n--- Reservation Form ---");

    state.requester_name = Text::new("Your name:").prompt()?;

    if catalog.plans.is_empty() {
        println!("⚠️  The catalog has no plans.");
    } else {
        let start = state
            .selected_plan
            .as_ref()
            .and_then(|current| catalog.plans.iter().position(|p| p.id == current.id))
            .unwrap_or(0);
        let plan = Select::new("Plan:", catalog.plans.clone())
            .with_starting_cursor(start)
            .prompt()?;
        state.selected_plan = Some(plan);
        show_running_total(&state);

        state.light_discount_agreed = Confirm::new("Apply the light discount (agree to its terms)?")
            .with_default(false)
            .prompt()?;
        show_running_total(&state);
    }

    let kinds = vec![CouponKind::Unused, CouponKind::Referral, CouponKind::Percent];
    let kind = Select::new("Coupon:", kinds).prompt()?;
    let percent = if kind == CouponKind::Percent {
        Some(Text::new("Percent off (1-99):").prompt()?)
    } else {
        None
    };
    state.coupon = Some(kind.with_percent(percent.as_deref()));
    show_running_total(&state);

    state.payment_method = prompt_payment(catalog)?;
    show_running_total(&state);

    state.remarks = Text::new("Remarks (optional):").prompt()?;
    state.all_agreements_checked = Confirm::new("I have read and agree to all confirmation items")
        .with_default(false)
        .prompt()?;

    debug!(?state, "form captured");
    Ok(state)
}

fn prompt_payment(catalog: &Catalog) -> Result<Option<PaymentMethod>, OrderError> {
    let choice = Select::new("Payment method:", PaymentChoice::options(catalog)).prompt()?;
    Ok(choice.into_method())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn reset_selects_default_plan_and_no_coupon() {
        let state = reset_form(&catalog());
        assert_eq!(state.selected_plan.as_ref().map(|p| p.id.as_str()), Some("monthly"));
        assert_eq!(state.coupon, Some(Coupon::Unused));
        assert!(!state.light_discount_agreed);
        assert!(!state.all_agreements_checked);
        assert!(state.payment_method.is_none());
        assert!(state.requester_name.is_empty());
    }

    #[test]
    fn flags_resolve_against_catalog() {
        let input = FormInput {
            requester_name: "Sato".into(),
            plan: Some("monthly".into()),
            light_discount: true,
            coupon: Some(CouponKind::Percent),
            percent: Some("10%".into()),
            payment_method: Some("コンビニ払い".into()),
            remarks: "hi".into(),
            agreed: true,
        };
        let state = build_state(&catalog(), &input).unwrap();
        assert_eq!(state.coupon, Some(Coupon::Percent(10)));
        assert!(state.payment_method.unwrap().is_convenience_store());
        assert_eq!(state.selected_plan.unwrap().base_price, 5000);
    }

    #[test]
    fn missing_values_stay_missing() {
        let state = build_state(&catalog(), &FormInput::default()).unwrap();
        assert_eq!(state, FormState::default());
    }

    #[test]
    fn percent_without_value_is_zero() {
        assert_eq!(CouponKind::Percent.with_percent(None), Coupon::Percent(0));
        assert_eq!(CouponKind::Percent.with_percent(Some("abc")), Coupon::Percent(0));
        assert_eq!(CouponKind::Referral.with_percent(Some("10")), Coupon::Referral);
    }

    #[test]
    fn payment_choices_keep_their_own_method() {
        // one method's label is another method's value
        let mut cat = catalog();
        cat.payment_methods = vec![
            PaymentMethod {
                value: "銀行振込".into(),
                label: "コンビニ払い".into(),
            },
            PaymentMethod {
                value: "コンビニ払い".into(),
                label: "Convenience store".into(),
            },
        ];

        let options = PaymentChoice::options(&cat);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].to_string(), "(not selected)");
        assert_eq!(options[1].to_string(), "コンビニ払い");

        let picked = options[1].clone().into_method().unwrap();
        assert_eq!(picked.value, "銀行振込");
        assert!(!picked.is_convenience_store());
        assert_eq!(options[0].clone().into_method(), None);
    }

    #[test]
    fn unknown_keys_are_errors() {
        let input = FormInput {
            plan: Some("weekly".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_state(&catalog(), &input),
            Err(OrderError::UnknownPlan(id)) if id == "weekly"
        ));

        let input = FormInput {
            payment_method: Some("cash".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_state(&catalog(), &input),
            Err(OrderError::UnknownPaymentMethod(_))
        ));
    }
}
