use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Estimated income statement.
///
/// `cost_of_goods` is what was spent buying stock (purchase value from the
/// kardex), `operating_expenses` the recorded expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub income: Decimal,
    pub cost_of_goods: Decimal,
    pub operating_expenses: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    /// `net_profit / income * 100`; `None` without income.
    pub margin_percent: Option<Decimal>,
}

impl ProfitAndLoss {
    pub fn compute(income: Decimal, cost_of_goods: Decimal, operating_expenses: Decimal) -> Self {
        let total_expenses = cost_of_goods.saturating_add(operating_expenses);
        let net_profit = income.saturating_sub(total_expenses);
        let margin_percent = if income.is_zero() {
            None
        } else {
            net_profit
                .checked_div(income)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        };
        Self {
            income,
            cost_of_goods,
            operating_expenses,
            total_expenses,
            net_profit,
            margin_percent,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }
}
