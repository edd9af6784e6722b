use mirai_navi_order::config::Catalog;
use mirai_navi_order::form::{self, CouponKind, FormInput};
use mirai_navi_order::{
    Coupon, FieldId, FormState, LineItem, PlanOption, compute_charges, render_summary, validate,
};

fn catalog() -> Catalog {
    Catalog::builtin().expect("builtin catalog parses")
}

fn filled_in() -> FormInput {
    FormInput {
        requester_name: "Suzuki Hanako".into(),
        plan: Some("monthly".into()),
        light_discount: true,
        coupon: Some(CouponKind::Percent),
        percent: Some("10".into()),
        payment_method: Some("コンビニ払い".into()),
        remarks: String::new(),
        agreed: true,
    }
}

#[test]
fn complete_order_prices_validates_and_summarizes() {
    let state = form::build_state(&catalog(), &filled_in()).unwrap();

    let charges = compute_charges(&state);
    assert_eq!(charges.subtotal, 4000);
    assert_eq!(charges.total, 3820);

    assert!(validate(&state).is_valid());

    let payment = state.payment_method.as_ref().map(|m| m.label.as_str());
    let text = render_summary(&charges.items, charges.total, payment, &state.remarks).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        &lines[2..6],
        &[
            "Monthly plan  ¥5,000",
            "light discount  -¥1,000",
            "10% off coupon  -¥400",
            "convenience store fee  ¥220",
        ]
    );
    assert_eq!(lines[6], "");
    assert_eq!(lines[8], "total: ¥3,820");
    assert!(text.ends_with("I apply with the above details."));
}

#[test]
fn summary_has_one_line_per_item_in_order() {
    let state = form::build_state(
        &catalog(),
        &FormInput {
            coupon: Some(CouponKind::Referral),
            ..filled_in()
        },
    )
    .unwrap();
    let charges = compute_charges(&state);
    let text = render_summary(&charges.items, charges.total, None, "").unwrap();

    let positions: Vec<usize> = charges
        .items
        .iter()
        .map(|item| text.find(&format!("{}  ", item.label)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(text.find("total: ").unwrap() > *positions.last().unwrap());
}

#[test]
fn total_is_sum_of_items_across_inputs() {
    let coupons = [
        None,
        Some(Coupon::Unused),
        Some(Coupon::Referral),
        Some(Coupon::Percent(0)),
        Some(Coupon::Percent(1)),
        Some(Coupon::Percent(33)),
        Some(Coupon::Percent(99)),
        Some(Coupon::Percent(100)),
    ];
    let cat = catalog();
    for plan in cat.plans.iter().cloned().map(Some).chain([None]) {
        for light in [false, true] {
            for coupon in coupons {
                for payment in cat.payment_methods.iter().cloned().map(Some).chain([None]) {
                    let state = FormState {
                        selected_plan: plan.clone(),
                        light_discount_agreed: light,
                        coupon,
                        payment_method: payment,
                        ..Default::default()
                    };
                    let charges = compute_charges(&state);
                    let sum: i64 = charges.items.iter().map(|i| i.amount).sum();
                    assert_eq!(sum, charges.total, "{state:?}");
                }
            }
        }
    }
}

#[test]
fn no_plan_has_no_plan_lines_and_fails_validation() {
    let state = form::build_state(
        &catalog(),
        &FormInput {
            plan: None,
            coupon: Some(CouponKind::Unused),
            payment_method: Some("銀行振込".into()),
            ..filled_in()
        },
    )
    .unwrap();

    assert!(compute_charges(&state).items.is_empty());
    let result = validate(&state);
    assert_eq!(result.first_error().map(|e| e.field), Some(FieldId::Plan));
    assert_eq!(result.first_error().map(|e| e.message), Some("please select a plan"));
}

#[test]
fn referral_on_3000_subtotal() {
    let state = FormState {
        selected_plan: Some(PlanOption {
            id: "custom".into(),
            label: "Custom plan".into(),
            base_price: 3000,
            light_discount_price: 0,
        }),
        coupon: Some(Coupon::Referral),
        ..Default::default()
    };
    let charges = compute_charges(&state);
    assert_eq!(charges.total, 2500);
    assert_eq!(
        charges.items.iter().filter(|i| i.amount < 0).collect::<Vec<_>>(),
        vec![&LineItem::new("referral discount", -500)]
    );
}

#[test]
fn reset_form_only_needs_the_user_specific_fields() {
    let mut state = form::reset_form(&catalog());
    let result = validate(&state);
    assert_eq!(
        result.failing_fields(),
        &[FieldId::RequesterName, FieldId::PaymentMethod, FieldId::Agreement]
    );

    state.requester_name = "Ito".into();
    state.payment_method = catalog().payment_method("Credit card").cloned();
    state.all_agreements_checked = true;
    assert!(validate(&state).is_valid());
    assert_eq!(compute_charges(&state).total, 5000);
}
