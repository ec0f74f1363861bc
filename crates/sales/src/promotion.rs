use core::fmt;
use std::collections::BTreeSet;

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restoflow_catalog::{MenuCategory, MenuItemId};
use restoflow_core::DomainError;

use crate::order::OrderLine;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromotionId(uuid::Uuid);

restoflow_core::uuid_newtype!(PromotionId, "PromotionId");

/// Discount rule of a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PromotionKind {
    /// Percent off, `0..=100`.
    Percentage(Decimal),
    /// Flat amount off the subtotal.
    FixedAmount(Decimal),
    /// Every second unit of a targeted line is free.
    TwoForOne,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub name: String,
    pub description: Option<String>,
    pub kind: PromotionKind,
    /// Days the promotion may be applied; empty means every day.
    pub active_days: Vec<Weekday>,
    pub target_category: Option<MenuCategory>,
    pub target_products: BTreeSet<MenuItemId>,
    pub is_active: bool,
}

impl Promotion {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("promotion name cannot be empty"));
        }
        match self.kind {
            PromotionKind::Percentage(p) if p.is_sign_negative() || p > Decimal::ONE_HUNDRED => {
                Err(DomainError::invalid(format!(
                    "percentage must be between 0 and 100 (got {p})"
                )))
            }
            PromotionKind::FixedAmount(a) if a.is_sign_negative() => Err(DomainError::invalid(
                format!("fixed discount cannot be negative (got {a})"),
            )),
            _ => Ok(()),
        }
    }

    /// Whether a line falls under this promotion's targeting.
    ///
    /// An explicit product set wins over the category; with neither, every
    /// line is targeted.
    pub fn targets(&self, line: &OrderLine) -> bool {
        if !self.target_products.is_empty() {
            return self.target_products.contains(&line.menu_item_id);
        }
        match self.target_category {
            Some(category) => line.category == category,
            None => true,
        }
    }

    pub fn runs_on(&self, weekday: Weekday) -> bool {
        self.active_days.is_empty() || self.active_days.contains(&weekday)
    }
}

/// Which lines a percentage promotion discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageScope {
    /// Percent of the whole subtotal regardless of targeting (POS behaviour).
    #[default]
    WholeOrder,
    /// Percent of the targeted lines only.
    TargetedLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotApplicableReason {
    EmptyOrder,
    NoEligibleItems,
    Inactive,
    OutOfSchedule,
}

impl fmt::Display for NotApplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotApplicableReason::EmptyOrder => "the order has no items",
            NotApplicableReason::NoEligibleItems => "no eligible items in the order",
            NotApplicableReason::Inactive => "the promotion is switched off",
            NotApplicableReason::OutOfSchedule => "the promotion does not run today",
        })
    }
}

/// Result of evaluating one promotion against one order.
///
/// `Applied` with a zero discount is a different answer from
/// `NotApplicable`: the first means the order qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionOutcome {
    Applied { discount: Decimal },
    NotApplicable(NotApplicableReason),
}

impl PromotionOutcome {
    pub fn discount(&self) -> Decimal {
        match self {
            PromotionOutcome::Applied { discount } => *discount,
            PromotionOutcome::NotApplicable(_) => Decimal::ZERO,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, PromotionOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionEvaluator {
    percentage_scope: PercentageScope,
}

impl PromotionEvaluator {
    pub fn new(percentage_scope: PercentageScope) -> Self {
        Self { percentage_scope }
    }

    pub fn percentage_scope(&self) -> PercentageScope {
        self.percentage_scope
    }

    /// Discount for `lines`, ignoring the promotion's schedule and switch.
    pub fn evaluate(&self, promotion: &Promotion, lines: &[OrderLine]) -> PromotionOutcome {
        if lines.is_empty() {
            return PromotionOutcome::NotApplicable(NotApplicableReason::EmptyOrder);
        }
        let subtotal: Decimal = lines.iter().map(OrderLine::line_total).sum();

        match promotion.kind {
            PromotionKind::Percentage(percent) => {
                let base = match self.percentage_scope {
                    PercentageScope::WholeOrder => subtotal,
                    PercentageScope::TargetedLines => {
                        let mut targeted = lines.iter().filter(|l| promotion.targets(l)).peekable();
                        if targeted.peek().is_none() {
                            return PromotionOutcome::NotApplicable(
                                NotApplicableReason::NoEligibleItems,
                            );
                        }
                        targeted.map(OrderLine::line_total).sum()
                    }
                };
                PromotionOutcome::Applied {
                    discount: base * percent / Decimal::ONE_HUNDRED,
                }
            }
            PromotionKind::FixedAmount(amount) => PromotionOutcome::Applied {
                discount: amount.min(subtotal).max(Decimal::ZERO),
            },
            PromotionKind::TwoForOne => {
                let discount: Decimal = lines
                    .iter()
                    .filter(|l| promotion.targets(l))
                    .map(|l| Decimal::from(l.quantity / 2) * l.unit_price)
                    .sum();
                if discount.is_zero() {
                    PromotionOutcome::NotApplicable(NotApplicableReason::NoEligibleItems)
                } else {
                    PromotionOutcome::Applied { discount }
                }
            }
        }
    }

    /// Like [`evaluate`](Self::evaluate), but honours `is_active` and the
    /// active-day list.
    pub fn evaluate_on(
        &self,
        promotion: &Promotion,
        lines: &[OrderLine],
        weekday: Weekday,
    ) -> PromotionOutcome {
        if !promotion.is_active {
            return PromotionOutcome::NotApplicable(NotApplicableReason::Inactive);
        }
        if !promotion.runs_on(weekday) {
            return PromotionOutcome::NotApplicable(NotApplicableReason::OutOfSchedule);
        }
        self.evaluate(promotion, lines)
    }
}
