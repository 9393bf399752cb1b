use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Optional listing constraints, combined conjunctively. Every field is a
/// real `Option` so that e.g. a minimum amount of zero stays distinguishable
/// from "no minimum".
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl ExpenseFilter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && self.category_id.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }
}
