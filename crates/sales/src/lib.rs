//! Point-of-sale rules: promotion evaluation and order totals.
//!
//! Deterministic arithmetic over order lines; nothing here touches storage.

pub mod order;
pub mod promotion;

pub use order::{Order, OrderId, OrderLine, OrderTotals};
pub use promotion::{
    NotApplicableReason, PercentageScope, Promotion, PromotionEvaluator, PromotionId,
    PromotionKind, PromotionOutcome,
};
