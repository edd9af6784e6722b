//! Required-field checks for the order form.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::model::FormState;

/// Form fields that can fail validation, in check order.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    RequesterName,
    Plan,
    Coupon,
    PaymentMethod,
    Agreement,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::RequesterName,
        FieldId::Plan,
        FieldId::Coupon,
        FieldId::PaymentMethod,
        FieldId::Agreement,
    ];

    pub fn message(self) -> &'static str {
        match self {
            FieldId::RequesterName => "name is required",
            FieldId::Plan => "please select a plan",
            FieldId::Coupon => "please select coupon status",
            FieldId::PaymentMethod => "payment method is required",
            FieldId::Agreement => "agreement confirmation is required",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::RequesterName => "Name",
            FieldId::Plan => "Plan",
            FieldId::Coupon => "Coupon",
            FieldId::PaymentMethod => "Payment method",
            FieldId::Agreement => "Agreement",
        }
    }

    fn is_missing(self, state: &FormState) -> bool {
        match self {
            FieldId::RequesterName => state.requester_name.trim().is_empty(),
            FieldId::Plan => state.selected_plan.is_none(),
            FieldId::Coupon => state.coupon.is_none(),
            FieldId::PaymentMethod => state.payment_method.is_none(),
            FieldId::Agreement => !state.all_agreements_checked,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldId,
    pub message: &'static str,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    /// `first` is the error to show and scroll to; `failing` lists every
    /// field to highlight, in check order, starting with `first.field`.
    Invalid {
        first: FieldError,
        failing: Vec<FieldId>,
    },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { first, .. } => Some(first),
        }
    }

    pub fn failing_fields(&self) -> &[FieldId] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid { failing, .. } => failing,
        }
    }

    pub fn is_highlighted(&self, field: FieldId) -> bool {
        self.failing_fields().contains(&field)
    }
}

pub fn validate(state: &FormState) -> ValidationResult {
    let failing: Vec<FieldId> = FieldId::ALL
        .into_iter()
        .filter(|field| field.is_missing(state))
        .collect();

    let result = match failing.first() {
        None => ValidationResult::Valid,
        Some(&field) => ValidationResult::Invalid {
            first: FieldError {
                field,
                message: field.message(),
            },
            failing,
        },
    };
    debug!(?result, "validated form");
    result
}
