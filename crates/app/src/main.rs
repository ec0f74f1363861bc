//! Demo run over the seeded restaurant: stock summary, one table's order,
//! kitchen consumption and the AI weekly analysis.

use anyhow::Context;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use restoflow_ai::{Advisor, BusinessAnalysisJob, HttpTextGenerator, MenuDescriptionJob};
use restoflow_core::{Entity, TenantId};
use restoflow_infra::{AppConfig, InventoryLedger, seed};
use restoflow_sales::{Order, OrderId, OrderLine, PromotionEvaluator};

fn main() -> anyhow::Result<()> {
    restoflow_observability::init();

    let config = AppConfig::from_env().context("reading RESTOFLOW_* configuration")?;
    info!(
        negative_stock = ?config.negative_stock,
        tax_rate = %config.tax_rate,
        tip_rate = %config.tip_rate,
        "configuration loaded"
    );

    let mut ledger = InventoryLedger::in_memory(TenantId::new(), config.negative_stock);
    let data = seed::load(&mut ledger).context("seeding demo restaurant")?;
    info!(
        ingredients = ledger.ingredients().len(),
        dishes = data.menu.len(),
        valuation = %ledger.valuation(),
        "restaurant ready"
    );
    for ingredient in ledger.low_stock() {
        warn!(
            sku = ingredient.sku(),
            stock = %ingredient.current_stock(),
            min = %ingredient.min_stock(),
            supplier = data.suppliers.display_name(ingredient.supplier_id()),
            "low stock"
        );
    }

    let evaluator = PromotionEvaluator::new(config.percentage_scope);
    let today = Utc::now().weekday();
    let mut order = Order::new(OrderId::new());
    for (dish, quantity) in [("Artisan burger", 2), ("Coconut lemonade", 2)] {
        let id = data
            .dishes
            .get(dish)
            .with_context(|| format!("dish '{dish}' missing from menu"))?;
        let item = data.menu.orderable(id)?;
        order.add_line(OrderLine::for_item(item, quantity)?)?;
    }
    for promotion in &data.promotions {
        let outcome = order.apply_promotion(promotion, &evaluator, today);
        info!(promotion = %promotion.name, weekday = %today, ?outcome, "promotion evaluated");
    }

    let tip = order.suggested_tip(config.tip_rate);
    let totals = order.totals(&evaluator, config.tax_rate, tip);
    info!(
        subtotal = %totals.subtotal,
        discount = %totals.discount,
        tax = %totals.tax,
        tip = %totals.tip,
        total = %totals.total,
        "order totals"
    );

    let notes = format!("Order {}", order.id());
    for line in order.lines() {
        let Some(recipe) = data.menu.get(&line.menu_item_id)?.recipe.as_ref() else {
            continue;
        };
        ledger.consume_recipe(recipe, line.quantity, &config.actor, Some(&notes))?;
    }
    info!(valuation = %ledger.valuation(), "stock after service");

    let advisor = Advisor::new(HttpTextGenerator::new(config.ai.clone())?);
    if !advisor.generator().is_configured() {
        warn!("RESTOFLOW_AI_API_KEY is not set; AI output will be placeholders");
    }
    let insights = advisor.run(&BusinessAnalysisJob::new(data.weekly_sales.clone()));
    for insight in &insights.insights {
        info!(%insight, "weekly insight");
    }
    info!(strategy = %insights.strategy, "suggested strategy");

    let blurb = advisor.run(&MenuDescriptionJob::new(
        "Artisan burger",
        "angus beef, paipa cheese, brioche",
    ));
    info!(%blurb, "menu description");

    let week_sales: Decimal = data.weekly_sales.iter().map(|d| d.sales).sum();
    let report = ledger.profit_and_loss(week_sales, &data.expenses);
    info!(
        %week_sales,
        cost_of_goods = %report.cost_of_goods,
        expenses = %report.operating_expenses,
        net_profit = %report.net_profit,
        margin = ?report.margin_percent,
        "week closed"
    );
    Ok(())
}
