//! Operating expenses and the profit-and-loss view built from sales income,
//! inventory purchases and those expenses.

pub mod expense;
pub mod report;

pub use expense::{Expense, ExpenseBook, ExpenseCategory, ExpenseId, PaymentMethod};
pub use report::ProfitAndLoss;
