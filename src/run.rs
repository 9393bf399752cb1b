use anyhow::Result;
use chrono::{Datelike, Local};
use rust_decimal::Decimal;

use crate::db::{CategoryInsert, Database};
use crate::models::{Expense, ExpenseFilter, ExpenseRow};
use crate::validate::{self, Verdict};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "show" => cli_show(&args[2..], db),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "categories" => cli_categories(db),
        "add-category" => cli_add_category(&args[2..], db),
        "report" => cli_report(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("outlay {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Outlay — local-only expense tracker");
    println!();
    println!("Usage: outlay <command>");
    println!();
    println!("Commands:");
    println!("  add <category> <amount> <date|today> [description...]");
    println!("                                Record an expense (category by id or name)");
    println!("  list [filters]                List expenses, newest first");
    println!("    --from <YYYY-MM-DD>         Earliest date (inclusive)");
    println!("    --to <YYYY-MM-DD>           Latest date (inclusive)");
    println!("    --category <id|name>        Only this category");
    println!("    --min <amount>              Minimum amount (inclusive)");
    println!("    --max <amount>              Maximum amount (inclusive)");
    println!("  show <id>                     Show one expense");
    println!("  edit <id> <category> <amount> <date|today> [description...]");
    println!("                                Replace all fields of an expense");
    println!("  delete <id> --yes             Delete an expense (no undo)");
    println!("  categories                    List categories");
    println!("  add-category <name>           Add a category");
    println!("  report [year month] [--top N] Top categories by spend for a month");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Unwrap a validator verdict, turning a rejection into a printed error.
fn require<T>(verdict: Verdict<T>) -> Result<T> {
    match verdict {
        Verdict::Valid(value) => Ok(value),
        Verdict::Invalid(msg) => anyhow::bail!(msg),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    if args.last().is_some_and(|a| a == flag) {
        anyhow::bail!("Missing value for {flag}.");
    }
    Ok(args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str()))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

// ── Commands ──────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: outlay add <category> <amount> <date|today> [description...]");
    }

    let category_id = require(validate::validate_category(db, &args[0])?)?;
    let amount = require(validate::validate_amount(&args[1]))?;
    let date = if args[2] == "today" {
        Local::now().date_naive()
    } else {
        require(validate::validate_date(&args[2], false))?
    };
    let desc_raw = args[3..].join(" ");
    let description = require(validate::validate_description(Some(&desc_raw)))?;

    let expense = Expense {
        amount,
        category_id: Some(category_id),
        date,
        description,
    };
    let id = db.insert_expense(&expense)?;
    println!("Added expense #{id}: {} on {date}", format_amount(amount));
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let mut filter = ExpenseFilter::none();

    if let Some(raw) = flag_value(args, "--from")? {
        filter.date_from = Some(require(validate::validate_date(raw, true))?);
    }
    if let Some(raw) = flag_value(args, "--to")? {
        filter.date_to = Some(require(validate::validate_date(raw, true))?);
    }
    if let Some(raw) = flag_value(args, "--category")? {
        filter.category_id = Some(require(validate::validate_category(db, raw)?)?);
    }
    if let Some(raw) = flag_value(args, "--min")? {
        filter.min_amount = Some(require(validate::validate_amount(raw))?);
    }
    if let Some(raw) = flag_value(args, "--max")? {
        filter.max_amount = Some(require(validate::validate_amount(raw))?);
    }

    let rows = db.get_expenses(&filter)?;
    if rows.is_empty() {
        if filter.is_empty() {
            println!("No expenses found.");
        } else {
            println!("No expenses match the given filters.");
        }
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<16} {:>12}  {}",
        "ID", "Date", "Category", "Amount", "Description"
    );
    println!("{}", "-".repeat(75));
    let mut total = Decimal::ZERO;
    for row in &rows {
        print_expense_line(row);
        total += row.amount;
    }
    println!("{}", "-".repeat(75));
    println!("{:<36} {:>12}", "Total:", format_amount(total));
    println!();
    println!("{} expense(s)", rows.len());
    Ok(())
}

fn cli_show(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: outlay show <id>");
    }
    let id = require(validate::validate_expense_id(db, &args[0])?)?;
    let row = db
        .get_expense_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense ID {id} does not exist."))?;

    println!("Expense #{}", row.id);
    println!("  Amount:      {}", format_amount(row.amount));
    match row.category_id {
        Some(cid) => println!("  Category:    {} (#{cid})", row.category_label()),
        None => println!("  Category:    (none)"),
    }
    println!("  Date:        {}", row.date);
    println!(
        "  Description: {}",
        if row.description.is_empty() {
            "(none)"
        } else {
            row.description.as_str()
        }
    );
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 4 {
        anyhow::bail!("Usage: outlay edit <id> <category> <amount> <date|today> [description...]");
    }

    // Existence first: nothing else is attempted for an unknown id.
    let id = require(validate::validate_expense_id(db, &args[0])?)?;
    let category_id = require(validate::validate_category(db, &args[1])?)?;
    let amount = require(validate::validate_amount(&args[2]))?;
    let date = if args[3] == "today" {
        Local::now().date_naive()
    } else {
        require(validate::validate_date(&args[3], false))?
    };
    let desc_raw = args[4..].join(" ");
    let description = require(validate::validate_description(Some(&desc_raw)))?;

    let expense = Expense {
        amount,
        category_id: Some(category_id),
        date,
        description,
    };
    db.update_expense(id, &expense)?;
    println!("Updated expense #{id}.");
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: outlay delete <id> --yes");
    }
    let id = require(validate::validate_expense_id(db, &args[0])?)?;
    if !has_flag(args, "--yes") {
        anyhow::bail!("Deleting expense #{id} cannot be undone. Re-run with --yes to confirm.");
    }
    db.delete_expense(id)?;
    println!("Deleted expense #{id}.");
    Ok(())
}

fn cli_categories(db: &mut Database) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        println!("No categories available.");
        return Ok(());
    }
    println!("Available categories:");
    for cat in &categories {
        println!("  {:>3}. {}", cat.id.unwrap_or_default(), cat.name);
    }
    Ok(())
}

fn cli_add_category(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: outlay add-category <name>");
    }
    let name = args.join(" ");
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Category name cannot be empty.");
    }
    if name.chars().count() > 50 {
        anyhow::bail!("Category name is too long. Maximum 50 characters.");
    }
    match db.insert_category(name)? {
        CategoryInsert::Created(id) => println!("Added category #{id}: {name}"),
        CategoryInsert::Duplicate => anyhow::bail!("Category '{name}' already exists."),
    }
    Ok(())
}

fn cli_report(args: &[String], db: &mut Database) -> Result<()> {
    let today = Local::now().date_naive();

    // Collect positional args, skipping flags and their values.
    let mut positional: Vec<&str> = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--top" {
            iter.next();
        } else if !arg.starts_with("--") {
            positional.push(arg.as_str());
        }
    }

    let (year, month) = match positional.len() {
        0 => (today.year(), today.month()),
        2 => (
            require(validate::validate_year(positional[0]))?,
            require(validate::validate_month(positional[1]))?,
        ),
        _ => anyhow::bail!("Usage: outlay report [year month] [--top N]"),
    };

    let limit: usize = match flag_value(args, "--top")? {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid --top value: {raw}"))?,
        None => 3,
    };

    let rows = crate::report::monthly_top_categories(db, year, month, limit)?;
    if rows.is_empty() {
        println!("No expenses found for {year}-{month:02}.");
        return Ok(());
    }

    println!("Top {} categories for {year}-{month:02}:", rows.len());
    let total: Decimal = rows.iter().map(|(_, t)| *t).sum();
    for (rank, (name, amount)) in rows.iter().enumerate() {
        let label = name.as_deref().unwrap_or("(none)");
        let share = if total.is_zero() {
            Decimal::ZERO
        } else {
            *amount / total * Decimal::from(100)
        };
        println!(
            "  {}. {:<16} {:>12}  ({:.1}%)",
            rank + 1,
            label,
            format_amount(*amount),
            share
        );
    }
    println!();
    println!("{:<20} {:>12}", "Total tracked:", format_amount(total));
    Ok(())
}

// ── Formatting helpers ────────────────────────────────────────

fn print_expense_line(row: &ExpenseRow) {
    println!(
        "{:<6} {:<12} {:<16} {:>12}  {}",
        row.id,
        row.date.to_string(),
        truncate(row.category_label(), 16),
        format_amount(row.amount),
        truncate(&row.description, 30)
    );
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
