mod category;
mod expense;
mod filter;

pub use category::Category;
pub use expense::{Expense, ExpenseRow};
pub use filter::ExpenseFilter;

#[cfg(test)]
mod tests;
