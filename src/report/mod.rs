use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Database;

/// Half-open date range covering one calendar month:
/// `[first-of-month, first-of-next-month)`. December rolls into January of
/// the following year.
pub(crate) fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// Top `limit` categories by summed spend within the given month, highest
/// first. Fewer groups than `limit` returns all of them; a month with no
/// expenses returns an empty vec. Expenses with no resolvable category are
/// grouped under `None`, not dropped.
pub(crate) fn monthly_top_categories(
    db: &Database,
    year: i32,
    month: u32,
    limit: usize,
) -> Result<Vec<(Option<String>, Decimal)>> {
    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| anyhow::anyhow!("Invalid report month: {year}-{month:02}"))?;
    let mut totals = db.get_category_totals_between(start, end)?;
    totals.truncate(limit);
    Ok(totals)
}
