#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::Database;
use crate::models::Expense;
use rust_decimal_macros::dec;

fn invalid_message<T: std::fmt::Debug>(verdict: Verdict<T>) -> String {
    match verdict {
        Verdict::Invalid(msg) => msg,
        Verdict::Valid(v) => panic!("expected Invalid, got Valid({v:?})"),
    }
}

fn valid_value<T>(verdict: Verdict<T>) -> T {
    match verdict {
        Verdict::Valid(v) => v,
        Verdict::Invalid(msg) => panic!("expected Valid, got Invalid({msg})"),
    }
}

// ── Amount ────────────────────────────────────────────────────

#[test]
fn test_amount_valid() {
    assert_eq!(valid_value(validate_amount("12.50")), dec!(12.50));
    assert_eq!(valid_value(validate_amount("1")), dec!(1.00));
    assert_eq!(valid_value(validate_amount("1000000")), dec!(1000000.00));
    assert_eq!(valid_value(validate_amount("  45.99  ")), dec!(45.99));
}

#[test]
fn test_amount_normalized_to_two_places() {
    // The cleaned value carries scale 2 regardless of input shape.
    assert_eq!(valid_value(validate_amount("12.5")).to_string(), "12.50");
    assert_eq!(valid_value(validate_amount("7")).to_string(), "7.00");
}

#[test]
fn test_amount_trailing_zeros_not_significant() {
    assert_eq!(valid_value(validate_amount("12.500")), dec!(12.50));
}

#[test]
fn test_amount_too_many_decimal_places() {
    let msg = invalid_message(validate_amount("12.555"));
    assert!(msg.contains("2 decimal places"));
}

#[test]
fn test_amount_zero_and_negative() {
    assert!(!validate_amount("0").is_valid());
    assert!(!validate_amount("-5.00").is_valid());
    let msg = invalid_message(validate_amount("0"));
    assert!(msg.contains("greater than zero"));
}

#[test]
fn test_amount_over_cap() {
    let msg = invalid_message(validate_amount("1000001"));
    assert!(msg.contains("1,000,000"));
    assert!(!validate_amount("1000000.01").is_valid());
}

#[test]
fn test_amount_not_a_number() {
    let msg = invalid_message(validate_amount("abc"));
    assert!(msg.contains("valid number"));
    assert!(!validate_amount("").is_valid());
    assert!(!validate_amount("12.3.4").is_valid());
}

// ── Date ──────────────────────────────────────────────────────

#[test]
fn test_date_valid() {
    let d = valid_value(validate_date("2024-03-01", false));
    assert_eq!(d.to_string(), "2024-03-01");
}

#[test]
fn test_date_leap_year() {
    assert!(validate_date("2024-02-29", false).is_valid());
    assert!(!validate_date("2023-02-29", false).is_valid());
}

#[test]
fn test_date_not_a_real_date() {
    assert!(!validate_date("2025-02-30", false).is_valid());
    assert!(!validate_date("2024-13-01", false).is_valid());
    assert!(!validate_date("2024-00-10", false).is_valid());
}

#[test]
fn test_date_strict_shape() {
    // Unpadded or reordered forms are format errors even when chrono could
    // parse them loosely.
    let msg = invalid_message(validate_date("2024-3-1", false));
    assert!(msg.contains("YYYY-MM-DD"));
    assert!(!validate_date("01-03-2024", false).is_valid());
    assert!(!validate_date("2024/03/01", false).is_valid());
    assert!(!validate_date("", false).is_valid());
}

#[test]
fn test_date_shape_check_is_ascii_only() {
    // The shape check must not panic and must reject non-ASCII digits
    // (fullwidth digits here) as a format error.
    let msg = invalid_message(validate_date("２024-03-01", false));
    assert!(msg.contains("YYYY-MM-DD"));
}

#[test]
fn test_date_before_1900() {
    let msg = invalid_message(validate_date("1899-12-31", false));
    assert!(msg.contains("old"));
    assert!(validate_date("1900-01-01", false).is_valid());
}

#[test]
fn test_date_future_rejected_by_default() {
    let tomorrow = Local::now().date_naive().succ_opt().unwrap();
    let raw = tomorrow.format("%Y-%m-%d").to_string();
    let msg = invalid_message(validate_date(&raw, false));
    assert!(msg.contains("future"));
}

#[test]
fn test_date_future_allowed_for_filters() {
    let tomorrow = Local::now().date_naive().succ_opt().unwrap();
    let raw = tomorrow.format("%Y-%m-%d").to_string();
    assert_eq!(valid_value(validate_date(&raw, true)), tomorrow);
}

#[test]
fn test_date_today_is_not_future() {
    let today = Local::now().date_naive();
    let raw = today.format("%Y-%m-%d").to_string();
    assert!(validate_date(&raw, false).is_valid());
}

// ── Category by id / name ─────────────────────────────────────

fn food_id(db: &Database) -> i64 {
    db.get_category_by_name("Food").unwrap().unwrap().id.unwrap()
}

#[test]
fn test_category_id_valid() {
    let db = Database::open_in_memory().unwrap();
    let id = food_id(&db);
    assert_eq!(
        valid_value(validate_category_id(&db, &id.to_string()).unwrap()),
        id
    );
}

#[test]
fn test_category_id_not_positive() {
    let db = Database::open_in_memory().unwrap();
    let msg = invalid_message(validate_category_id(&db, "0").unwrap());
    assert!(msg.contains("positive"));
    assert!(!validate_category_id(&db, "-3").unwrap().is_valid());
}

#[test]
fn test_category_id_not_an_integer() {
    let db = Database::open_in_memory().unwrap();
    let msg = invalid_message(validate_category_id(&db, "food").unwrap());
    assert!(msg.contains("integer"));
    assert!(!validate_category_id(&db, "1.5").unwrap().is_valid());
}

#[test]
fn test_category_id_nonexistent() {
    let db = Database::open_in_memory().unwrap();
    let msg = invalid_message(validate_category_id(&db, "9999").unwrap());
    assert!(msg.contains("9999"));
    assert!(msg.contains("does not exist"));
}

#[test]
fn test_category_name_valid_case_insensitive() {
    let db = Database::open_in_memory().unwrap();
    let id = food_id(&db);
    assert_eq!(valid_value(validate_category_name(&db, "food").unwrap()), id);
    assert_eq!(valid_value(validate_category_name(&db, "FOOD").unwrap()), id);
    assert_eq!(
        valid_value(validate_category_name(&db, "  Food  ").unwrap()),
        id
    );
}

#[test]
fn test_category_name_empty() {
    let db = Database::open_in_memory().unwrap();
    let msg = invalid_message(validate_category_name(&db, "   ").unwrap());
    assert!(msg.contains("empty"));
}

#[test]
fn test_category_name_nonexistent() {
    let db = Database::open_in_memory().unwrap();
    let msg = invalid_message(validate_category_name(&db, "Travel").unwrap());
    assert!(msg.contains("'Travel'"));
    assert!(msg.contains("does not exist"));
}

// ── Combined id-or-name ───────────────────────────────────────

#[test]
fn test_category_selector_accepts_id_and_name() {
    let db = Database::open_in_memory().unwrap();
    let id = food_id(&db);
    assert_eq!(
        valid_value(validate_category(&db, &id.to_string()).unwrap()),
        id
    );
    assert_eq!(valid_value(validate_category(&db, "Food").unwrap()), id);
}

#[test]
fn test_category_selector_name_message_wins() {
    let db = Database::open_in_memory().unwrap();

    // Not parseable as an id, unknown as a name: the name message shows.
    let msg = invalid_message(validate_category(&db, "NoSuch").unwrap());
    assert_eq!(msg, "Category 'NoSuch' does not exist.");

    // Parseable as an id but unknown: the fallback treats it as a name,
    // and that message still wins.
    let msg = invalid_message(validate_category(&db, "424242").unwrap());
    assert_eq!(msg, "Category '424242' does not exist.");
}

// ── Description ───────────────────────────────────────────────

#[test]
fn test_description_absent_is_empty() {
    assert_eq!(valid_value(validate_description(None)), "");
    assert_eq!(valid_value(validate_description(Some(""))), "");
}

#[test]
fn test_description_trimmed() {
    assert_eq!(valid_value(validate_description(Some("  lunch  "))), "lunch");
}

#[test]
fn test_description_length_limit() {
    let ok = "x".repeat(500);
    assert_eq!(valid_value(validate_description(Some(&ok))).len(), 500);

    let too_long = "x".repeat(501);
    let msg = invalid_message(validate_description(Some(&too_long)));
    assert!(msg.contains("500"));

    // Trimming happens before the length check.
    let padded = format!("  {}  ", "x".repeat(500));
    assert!(validate_description(Some(&padded)).is_valid());
}

// ── Expense id ────────────────────────────────────────────────

#[test]
fn test_expense_id_valid() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&Expense {
            amount: dec!(5.00),
            category_id: None,
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: String::new(),
        })
        .unwrap();
    assert_eq!(
        valid_value(validate_expense_id(&db, &id.to_string()).unwrap()),
        id
    );
}

#[test]
fn test_expense_id_nonexistent() {
    let db = Database::open_in_memory().unwrap();
    let msg = invalid_message(validate_expense_id(&db, "77").unwrap());
    assert_eq!(msg, "Expense ID 77 does not exist.");
}

#[test]
fn test_expense_id_malformed() {
    let db = Database::open_in_memory().unwrap();
    assert!(!validate_expense_id(&db, "abc").unwrap().is_valid());
    assert!(!validate_expense_id(&db, "0").unwrap().is_valid());
    assert!(!validate_expense_id(&db, "-1").unwrap().is_valid());
}

// ── Year / month ──────────────────────────────────────────────

#[test]
fn test_year_bounds() {
    let current = Local::now().year();
    assert_eq!(valid_value(validate_year(&current.to_string())), current);
    assert!(validate_year("1900").is_valid());
    assert!(validate_year(&(current + 1).to_string()).is_valid());
    assert!(!validate_year("1899").is_valid());
    assert!(!validate_year(&(current + 2).to_string()).is_valid());
}

#[test]
fn test_year_malformed() {
    let msg = invalid_message(validate_year("soon"));
    assert!(msg.contains("valid number"));
}

#[test]
fn test_month_bounds() {
    assert_eq!(valid_value(validate_month("1")), 1);
    assert_eq!(valid_value(validate_month("12")), 12);
    let msg = invalid_message(validate_month("0"));
    assert!(msg.contains("between 1 and 12"));
    assert!(!validate_month("13").is_valid());
    assert!(!validate_month("-1").is_valid());
}

#[test]
fn test_month_malformed() {
    let msg = invalid_message(validate_month("march"));
    assert!(msg.contains("between 1 and 12"));
}
