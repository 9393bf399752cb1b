#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_display() {
    let cat = Category {
        id: Some(4),
        name: "Utilities".into(),
    };
    assert_eq!(cat.to_string(), "Utilities");
}

// ── ExpenseRow ────────────────────────────────────────────────

#[test]
fn test_category_label() {
    let mut row = ExpenseRow {
        id: 1,
        amount: dec!(12.50),
        category_id: Some(1),
        category_name: Some("Food".into()),
        date: date("2024-03-01"),
        description: String::new(),
    };
    assert_eq!(row.category_label(), "Food");

    row.category_name = None;
    assert_eq!(row.category_label(), "(none)");
}

// ── ExpenseFilter ─────────────────────────────────────────────

#[test]
fn test_filter_default_is_empty() {
    assert!(ExpenseFilter::none().is_empty());
    assert!(ExpenseFilter::default().is_empty());
}

#[test]
fn test_filter_with_any_field_not_empty() {
    let filter = ExpenseFilter {
        min_amount: Some(dec!(0)),
        ..Default::default()
    };
    // A zero minimum is a real constraint, not "absent".
    assert!(!filter.is_empty());

    let filter = ExpenseFilter {
        date_from: Some(date("2024-01-01")),
        ..Default::default()
    };
    assert!(!filter.is_empty());
}
