//! Plain-text order summary and the terminal charges table.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::OrderError;
use crate::model::{Charges, LineItem, Yen};

// Embed template at compile time
const SUMMARY_TEMPLATE: &str = include_str!("../templates/summary.tera");
const SUMMARY_TEMPLATE_NAME: &str = "summary.txt";

pub const PAYMENT_NOT_SELECTED: &str = "not selected";

#[derive(Serialize)]
struct SummaryLine {
    label: String,
    amount: String,
}

#[derive(Serialize)]
struct SummaryContext<'a> {
    items: Vec<SummaryLine>,
    total: String,
    payment_method: &'a str,
    remarks: &'a str,
}

/// Formats yen as `¥12,345` / `-¥500`, independent of the host locale.
pub fn format_yen(amount: Yen) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

/// Renders the text handed to the clipboard / messaging app.
///
/// Only fails if the embedded template itself is broken.
pub fn render_summary(
    items: &[LineItem],
    total: Yen,
    payment_method_label: Option<&str>,
    remarks: &str,
) -> Result<String, OrderError> {
    let mut tera = Tera::default();
    tera.add_raw_template(SUMMARY_TEMPLATE_NAME, SUMMARY_TEMPLATE)?;

    let data = SummaryContext {
        items: items
            .iter()
            .map(|item| SummaryLine {
                label: item.label.trim().to_string(),
                amount: format_yen(item.amount),
            })
            .collect(),
        total: format_yen(total),
        payment_method: payment_method_label.unwrap_or(PAYMENT_NOT_SELECTED),
        remarks: remarks.trim(),
    };

    let context = Context::from_serialize(&data)?;
    Ok(tera.render(SUMMARY_TEMPLATE_NAME, &context)?)
}

/// Running-total table shown while the form is being filled in.
pub fn charges_table(charges: &Charges) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Item"), Cell::new("Amount")]);

    for item in &charges.items {
        let amount = Cell::new(format_yen(item.amount)).set_alignment(CellAlignment::Right);
        let amount = if item.amount < 0 {
            amount.fg(Color::Rgb { r: 4, g: 120, b: 87 })
        } else {
            amount
        };
        table.add_row(vec![Cell::new(&item.label), amount]);
    }

    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(format_yen(charges.total))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yen_formatting() {
        assert_eq!(format_yen(0), "¥0");
        assert_eq!(format_yen(220), "¥220");
        assert_eq!(format_yen(1000), "¥1,000");
        assert_eq!(format_yen(12345), "¥12,345");
        assert_eq!(format_yen(1_234_567), "¥1,234,567");
        assert_eq!(format_yen(-500), "-¥500");
        assert_eq!(format_yen(-100_000), "-¥100,000");
        assert_eq!(format_yen(i64::MIN), "-¥9,223,372,036,854,775,808");
    }

    #[test]
    fn full_summary_layout() {
        let items = vec![
            LineItem::new("Monthly plan", 5000),
            LineItem::new("light discount", -1000),
            LineItem::new("10% off coupon", -400),
            LineItem::new("convenience store fee", 220),
        ];
        let text = render_summary(&items, 3820, Some("Convenience store payment"), "  call after 6pm \n")
            .unwrap();
        let expected = "[Mirai Navi Application]\n\
            \n\
            Monthly plan  ¥5,000\n\
            light discount  -¥1,000\n\
            10% off coupon  -¥400\n\
            convenience store fee  ¥220\n\
            \n\
            --------------------------------\n\
            total: ¥3,820\n\
            --------------------------------\n\
            \n\
            payment method: Convenience store payment\n\
            remarks:\n\
            call after 6pm\n\
            \n\
            I apply with the above details.";
        assert_eq!(text, expected);
    }

    #[test]
    fn blank_remarks_are_left_out() {
        let items = vec![LineItem::new("Monthly plan", 5000)];
        let text = render_summary(&items, 5000, None, " \n ").unwrap();
        assert!(!text.contains("remarks:"));
        assert!(text.contains("payment method: not selected\n\nI apply"));
    }

    #[test]
    fn no_items_still_renders_total() {
        let text = render_summary(&[], 0, None, "").unwrap();
        assert!(text.starts_with("[Mirai Navi Application]\n\n\n----"));
        assert!(text.contains("total: ¥0\n"));
    }

    #[test]
    fn markup_in_labels_is_not_escaped() {
        let items = vec![LineItem::new("Plan <A> & \"B\"", 1)];
        let text = render_summary(&items, 1, None, "").unwrap();
        assert!(text.contains("Plan <A> & \"B\"  ¥1\n"));
    }

    #[test]
    fn table_has_row_per_item_plus_total() {
        let charges = Charges {
            items: vec![
                LineItem::new("Monthly plan", 5000),
                LineItem::new("referral discount", -500),
            ],
            subtotal: 5000,
            total: 4500,
        };
        let table = charges_table(&charges);
        assert_eq!(table.row_iter().count(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("-¥500"));
        assert!(rendered.contains("¥4,500"));
    }
}
