//! Input validation: every raw user string passes through exactly one of
//! these before it reaches the database.
//!
//! Malformed input is never a Rust error. Each validator returns a
//! [`Verdict`]: either the cleaned, typed value or a user-facing rejection
//! message, so callers can reprompt without special-casing. Validators that
//! consult the store return `Result<Verdict<T>>` - a persistence failure
//! propagates with `?` and stays distinguishable from a rejection.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::db::Database;

pub(crate) const MAX_AMOUNT: i64 = 1_000_000;
pub(crate) const MAX_DESCRIPTION_CHARS: usize = 500;
pub(crate) const MIN_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict<T> {
    Valid(T),
    Invalid(String),
}

impl<T> Verdict<T> {
    pub(crate) fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }
}

#[allow(clippy::unwrap_used)] // literal pattern, cannot fail
fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ASCII classes only: the regex crate is built without its Unicode
    // tables, and the date format is ASCII anyway.
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap())
}

/// Positive monetary amount with at most 2 significant fractional digits,
/// capped at 1,000,000. Parsed as an exact decimal, never a binary float.
/// The returned value carries scale 2.
pub(crate) fn validate_amount(input: &str) -> Verdict<Decimal> {
    let Ok(amount) = Decimal::from_str(input.trim()) else {
        return Verdict::Invalid("Invalid amount. Please enter a valid number.".into());
    };
    if amount <= Decimal::ZERO {
        return Verdict::Invalid("Amount must be greater than zero.".into());
    }
    if amount.normalize().scale() > 2 {
        return Verdict::Invalid("Amount can have at most 2 decimal places.".into());
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Verdict::Invalid(
            "Amount seems unreasonably high. Maximum is $1,000,000.".into(),
        );
    }
    let mut cleaned = amount;
    cleaned.rescale(2);
    Verdict::Valid(cleaned)
}

/// Strict `YYYY-MM-DD` calendar date. Years before 1900 are rejected;
/// future dates are rejected unless `allow_future` (filter ranges may look
/// forward, expense entry may not).
pub(crate) fn validate_date(input: &str, allow_future: bool) -> Verdict<NaiveDate> {
    let trimmed = input.trim();
    let invalid_format =
        || Verdict::Invalid("Invalid date format. Please use YYYY-MM-DD (e.g., 2025-11-30).".into());

    if !date_shape().is_match(trimmed) {
        return invalid_format();
    }
    let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") else {
        return invalid_format();
    };
    if date.year() < MIN_YEAR {
        return Verdict::Invalid("Date seems unreasonably old.".into());
    }
    if !allow_future && date > Local::now().date_naive() {
        return Verdict::Invalid("Expense date cannot be in the future.".into());
    }
    Verdict::Valid(date)
}

/// Positive integer that names an existing category. The existence check
/// goes through the repository so "is this id real" has one source of truth.
pub(crate) fn validate_category_id(db: &Database, input: &str) -> Result<Verdict<i64>> {
    let Ok(id) = input.trim().parse::<i64>() else {
        return Ok(Verdict::Invalid(
            "Category ID must be a valid integer.".into(),
        ));
    };
    if id <= 0 {
        return Ok(Verdict::Invalid(
            "Category ID must be a positive number.".into(),
        ));
    }
    if db.get_category_by_id(id)?.is_none() {
        return Ok(Verdict::Invalid(format!(
            "Category ID {id} does not exist."
        )));
    }
    Ok(Verdict::Valid(id))
}

/// Case-insensitive category name lookup; resolves to the id (the name is
/// never stored on an expense).
pub(crate) fn validate_category_name(db: &Database, input: &str) -> Result<Verdict<i64>> {
    let name = input.trim();
    if name.is_empty() {
        return Ok(Verdict::Invalid("Category name cannot be empty.".into()));
    }
    match db.get_category_by_name(name)? {
        Some(cat) => Ok(Verdict::Valid(cat.id.unwrap_or_default())),
        None => Ok(Verdict::Invalid(format!(
            "Category '{name}' does not exist."
        ))),
    }
}

/// Combined id-or-name category selector: id validation first, name lookup
/// as the fallback. When both fail the name attempt's message wins (it is
/// the more informative of the two). A database error on the id attempt
/// propagates immediately; no fallback happens.
pub(crate) fn validate_category(db: &Database, input: &str) -> Result<Verdict<i64>> {
    let by_id = validate_category_id(db, input)?;
    if by_id.is_valid() {
        return Ok(by_id);
    }
    validate_category_name(db, input)
}

/// Optional free text, trimmed, at most 500 characters. Absent input is the
/// empty string.
pub(crate) fn validate_description(input: Option<&str>) -> Verdict<String> {
    let cleaned = input.unwrap_or("").trim().to_string();
    if cleaned.chars().count() > MAX_DESCRIPTION_CHARS {
        return Verdict::Invalid("Description is too long. Maximum 500 characters.".into());
    }
    Verdict::Valid(cleaned)
}

/// Positive integer that names an existing expense; guards update/delete.
pub(crate) fn validate_expense_id(db: &Database, input: &str) -> Result<Verdict<i64>> {
    let Ok(id) = input.trim().parse::<i64>() else {
        return Ok(Verdict::Invalid(
            "Expense ID must be a valid integer.".into(),
        ));
    };
    if id <= 0 {
        return Ok(Verdict::Invalid(
            "Expense ID must be a positive number.".into(),
        ));
    }
    if !db.expense_exists(id)? {
        return Ok(Verdict::Invalid(format!("Expense ID {id} does not exist.")));
    }
    Ok(Verdict::Valid(id))
}

pub(crate) fn validate_year(input: &str) -> Verdict<i32> {
    let Ok(year) = input.trim().parse::<i32>() else {
        return Verdict::Invalid("Invalid year. Please enter a valid number.".into());
    };
    let max_year = Local::now().year() + 1;
    if year < MIN_YEAR || year > max_year {
        return Verdict::Invalid(format!("Year must be between 1900 and {max_year}."));
    }
    Verdict::Valid(year)
}

pub(crate) fn validate_month(input: &str) -> Verdict<u32> {
    // Parse signed so "-1" is a range rejection, not a parse rejection.
    let Ok(month) = input.trim().parse::<i64>() else {
        return Verdict::Invalid(
            "Invalid month. Please enter a number between 1 and 12.".into(),
        );
    };
    if !(1..=12).contains(&month) {
        return Verdict::Invalid("Month must be between 1 and 12.".into());
    }
    Verdict::Valid(month as u32)
}

#[cfg(test)]
mod tests;
