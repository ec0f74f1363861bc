use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restoflow_core::{DomainError, Entity};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(uuid::Uuid);

restoflow_core::uuid_newtype!(ExpenseId, "ExpenseId");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Services,
    Payroll,
    Maintenance,
    Rent,
    Marketing,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::Services => "SERVICES",
            ExpenseCategory::Payroll => "PAYROLL",
            ExpenseCategory::Maintenance => "MAINTENANCE",
            ExpenseCategory::Rent => "RENT",
            ExpenseCategory::Marketing => "MARKETING",
            ExpenseCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Card,
}

/// One operating expense (OPEX). Purchases of stock are not expenses here;
/// they come from the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub payment_method: PaymentMethod,
    pub date: DateTime<Utc>,
    pub registered_by: String,
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Expense register, newest first.
#[derive(Debug, Clone, Default)]
pub struct ExpenseBook {
    expenses: Vec<Expense>,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expense. Description and author must be non-blank and the
    /// amount strictly positive.
    pub fn record(&mut self, mut expense: Expense) -> Result<(), DomainError> {
        expense.description = expense.description.trim().to_string();
        expense.registered_by = expense.registered_by.trim().to_string();
        if expense.description.is_empty() {
            return Err(DomainError::invalid("expense description cannot be empty"));
        }
        if expense.registered_by.is_empty() {
            return Err(DomainError::invalid("registered_by cannot be empty"));
        }
        if expense.amount <= Decimal::ZERO {
            return Err(DomainError::invalid(format!(
                "expense amount must be greater than zero (got {})",
                expense.amount
            )));
        }
        if self.expenses.iter().any(|e| e.id == expense.id) {
            return Err(DomainError::conflict(format!("expense {} already recorded", expense.id)));
        }

        let at = self.expenses.partition_point(|e| e.date > expense.date);
        self.expenses.insert(at, expense);
        Ok(())
    }

    pub fn remove(&mut self, id: &ExpenseId) -> Result<Expense, DomainError> {
        let idx = self
            .expenses
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| DomainError::not_found(format!("expense {id}")))?;
        Ok(self.expenses.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }

    /// Sum of all amounts, saturating at the decimal bounds.
    pub fn total(&self) -> Decimal {
        self.expenses
            .iter()
            .map(|e| e.amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn total_for(&self, category: ExpenseCategory) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn expense(description: &str, amount: Decimal, category: ExpenseCategory, days_ago: i64) -> Expense {
        Expense {
            id: ExpenseId::new(),
            description: description.to_string(),
            amount,
            category,
            payment_method: PaymentMethod::Transfer,
            date: Utc::now() - Duration::days(days_ago),
            registered_by: "Admin".to_string(),
        }
    }

    #[test]
    fn record_keeps_newest_first_and_totals() {
        let mut book = ExpenseBook::new();
        book.record(expense("Electricity bill", dec!(450000), ExpenseCategory::Services, 5))
            .unwrap();
        book.record(expense("Extra ice", dec!(25000), ExpenseCategory::Other, 1)).unwrap();
        book.record(expense("Fridge repair", dec!(120000), ExpenseCategory::Maintenance, 10))
            .unwrap();

        let order: Vec<_> = book.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(order, vec!["Extra ice", "Electricity bill", "Fridge repair"]);
        assert_eq!(book.total(), dec!(595000));
        assert_eq!(book.total_for(ExpenseCategory::Services), dec!(450000));
        assert_eq!(book.total_for(ExpenseCategory::Rent), Decimal::ZERO);
    }

    #[test]
    fn record_validates_input() {
        let mut book = ExpenseBook::new();
        assert!(book.record(expense("  ", dec!(10), ExpenseCategory::Other, 0)).is_err());
        assert!(book.record(expense("Ice", dec!(0), ExpenseCategory::Other, 0)).is_err());

        let mut anonymous = expense("Ice", dec!(10), ExpenseCategory::Other, 0);
        anonymous.registered_by = String::new();
        assert!(book.record(anonymous).is_err());

        let ok = expense("Ice", dec!(10), ExpenseCategory::Other, 0);
        book.record(ok.clone()).unwrap();
        assert!(matches!(book.record(ok), Err(DomainError::Conflict(_))));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn remove_deletes_or_reports_not_found() {
        let mut book = ExpenseBook::new();
        let e = expense("Flyers", dec!(80000), ExpenseCategory::Marketing, 2);
        let id = e.id;
        book.record(e).unwrap();

        assert_eq!(book.remove(&id).unwrap().amount, dec!(80000));
        assert!(book.is_empty());
        assert!(matches!(book.remove(&id), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn category_wire_names() {
        assert_eq!(ExpenseCategory::Maintenance.to_string(), "MAINTENANCE");
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Other);
    }
}
