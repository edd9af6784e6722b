//! Reservation order form: pricing, validation and the shareable summary.
//!
//! The core (`pricing`, `validate`, `summary`) is pure and works on a
//! `FormState` snapshot. `form`, `config` and `handoff` are the terminal
//! front end around it.

pub mod config;
pub mod error;
pub mod form;
pub mod handoff;
pub mod model;
pub mod pricing;
pub mod summary;
pub mod validate;

pub use error::OrderError;
pub use model::{Charges, Coupon, FormState, LineItem, PaymentMethod, PlanOption, Yen};
pub use pricing::{compute_charges, parse_percent};
pub use summary::{format_yen, render_summary};
pub use validate::{FieldError, FieldId, ValidationResult, validate};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise, so the
/// interactive prompts stay readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
