mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

/// Outcome of `insert_category`: duplicates (case-insensitive) are a normal
/// contract-level outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategoryInsert {
    Created(i64),
    Duplicate,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Seed the default category set. Idempotent: each name is checked
    /// (case-insensitively) before insertion, so partial seeds heal and
    /// re-running never duplicates.
    fn seed_default_categories(&mut self) -> Result<()> {
        let defaults = [
            "Food",
            "Transportation",
            "Utilities",
            "Entertainment",
            "Rent",
            "Groceries",
            "Misc",
        ];

        let tx = self.conn.transaction()?;
        for name in &defaults {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(name) = LOWER(?1))",
                params![name],
                |row| row.get(0),
            )?;
            if !exists {
                tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category_id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT category_id, name FROM categories WHERE category_id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive exact-name lookup.
    pub(crate) fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT category_id, name FROM categories WHERE LOWER(name) = LOWER(?1)",
            params![name],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a category with an explicit case-insensitive duplicate check.
    /// The check and the insert run as one transaction.
    pub(crate) fn insert_category(&mut self, name: &str) -> Result<CategoryInsert> {
        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(name) = LOWER(?1))",
            params![name],
            |row| row.get(0),
        )?;
        if exists {
            return Ok(CategoryInsert::Duplicate);
        }
        tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(CategoryInsert::Created(id))
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (amount, category_id, expense_date, description)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.amount.to_string(),
                expense.category_id,
                expense.date,
                expense.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<ExpenseRow>> {
        let result = self.conn.query_row(
            "SELECT e.expense_id, e.amount, e.category_id, c.name, e.expense_date, e.description
             FROM expenses e
             LEFT JOIN categories c ON e.category_id = c.category_id
             WHERE e.expense_id = ?1",
            params![id],
            map_expense_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List expenses, narrowed by whichever filter fields are present.
    /// Absent fields impose no constraint.
    pub(crate) fn get_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRow>> {
        let mut sql = String::from(
            "SELECT e.expense_id, e.amount, e.category_id, c.name, e.expense_date, e.description
             FROM expenses e
             LEFT JOIN categories c ON e.category_id = c.category_id
             WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(from) = filter.date_from {
            sql.push_str(&format!(
                " AND e.expense_date >= ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(from));
        }
        if let Some(to) = filter.date_to {
            sql.push_str(&format!(
                " AND e.expense_date <= ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(to));
        }
        if let Some(cid) = filter.category_id {
            sql.push_str(&format!(" AND e.category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        // Amounts are stored as TEXT; compare numerically on both sides.
        if let Some(min) = filter.min_amount {
            sql.push_str(&format!(
                " AND CAST(e.amount AS REAL) >= CAST(?{} AS REAL)",
                param_values.len() + 1
            ));
            param_values.push(Box::new(min.to_string()));
        }
        if let Some(max) = filter.max_amount {
            sql.push_str(&format!(
                " AND CAST(e.amount AS REAL) <= CAST(?{} AS REAL)",
                param_values.len() + 1
            ));
            param_values.push(Box::new(max.to_string()));
        }

        sql.push_str(" ORDER BY e.expense_date DESC, e.expense_id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), map_expense_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Full-record replace of all mutable fields. Existence of `id` is the
    /// caller's precondition.
    pub(crate) fn update_expense(&self, id: i64, expense: &Expense) -> Result<()> {
        self.conn.execute(
            "UPDATE expenses
             SET amount = ?1, category_id = ?2, expense_date = ?3, description = ?4
             WHERE expense_id = ?5",
            params![
                expense.amount.to_string(),
                expense.category_id,
                expense.date,
                expense.description,
                id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_expense(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM expenses WHERE expense_id = ?1", params![id])?;
        Ok(())
    }

    /// Shared existence check for update/delete guards and id validation.
    pub(crate) fn expense_exists(&self, id: i64) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM expenses WHERE expense_id = ?1)",
            params![id],
            |row| row.get(0),
        )?)
    }

    // ── Aggregation ───────────────────────────────────────────

    /// Per-category spend totals over the half-open range [start, end),
    /// highest first. Expenses with an unresolvable category group under
    /// `None` instead of being dropped.
    pub(crate) fn get_category_totals_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(Option<String>, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, CAST(ROUND(SUM(e.amount), 2) AS TEXT)
             FROM expenses e
             LEFT JOIN categories c ON e.category_id = c.category_id
             WHERE e.expense_date >= ?1 AND e.expense_date < ?2
             GROUP BY c.name
             ORDER BY SUM(e.amount) DESC, c.name",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            let name: Option<String> = row.get(0)?;
            let total_str: String = row.get(1)?;
            Ok((
                name,
                Decimal::from_str(&total_str).unwrap_or_default().round_dp(2),
            ))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn map_expense_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExpenseRow> {
    let amount_str: String = row.get(1)?;
    Ok(ExpenseRow {
        id: row.get(0)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        category_id: row.get(2)?,
        category_name: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
    })
}
