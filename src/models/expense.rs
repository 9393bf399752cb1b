use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A validated expense ready for insert or full-record update. The
/// system-assigned id lives on [`ExpenseRow`]; writes address rows by an
/// explicit id parameter.
#[derive(Debug, Clone)]
pub struct Expense {
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub description: String,
}

/// An expense joined with its category's name. The category is a nullable
/// foreign key, so an unresolvable category yields `None` rather than
/// suppressing the row.
#[derive(Debug, Clone)]
pub struct ExpenseRow {
    pub id: i64,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub date: NaiveDate,
    pub description: String,
}

impl ExpenseRow {
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or("(none)")
    }
}
