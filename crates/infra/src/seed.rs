//! Demo restaurant: suppliers, stocked ingredients, a menu with recipes,
//! two promotions and a week of sales figures.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, Utc, Weekday};
use rust_decimal::Decimal;
use thiserror::Error;

use restoflow_ai::DailyStat;
use restoflow_catalog::{Menu, MenuCategory, MenuItem, MenuItemId, Recipe, RecipeLine};
use restoflow_core::DomainError;
use restoflow_finance::{Expense, ExpenseBook, ExpenseCategory, ExpenseId, PaymentMethod};
use restoflow_inventory::{
    IngredientId, StockDirection, Supplier, SupplierDirectory, SupplierId, UnitOfMeasure,
};
use restoflow_sales::{Promotion, PromotionId, PromotionKind};

use crate::event_store::EventStore;
use crate::ledger::{InventoryLedger, LedgerError, NewIngredient, TransactionRequest};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone)]
pub struct SeedData {
    pub suppliers: SupplierDirectory,
    /// Ingredient ids by SKU.
    pub ingredients: BTreeMap<&'static str, IngredientId>,
    pub menu: Menu,
    /// Menu item ids by dish name.
    pub dishes: BTreeMap<&'static str, MenuItemId>,
    pub promotions: Vec<Promotion>,
    pub expenses: ExpenseBook,
    pub weekly_sales: Vec<DailyStat>,
}

struct IngredientRow {
    sku: &'static str,
    name: &'static str,
    category: &'static str,
    cost: i64,
    stock: i64,
    min: i64,
    max: i64,
    supplier: usize,
}

const INGREDIENTS: [IngredientRow; 7] = [
    IngredientRow { sku: "PRD-CAR-01", name: "Burger patty (150g pack)", category: "Production", cost: 5800, stock: 0, min: 20, max: 200, supplier: 1 },
    IngredientRow { sku: "PRD-LAC-01", name: "Paipa cheese (30g slice)", category: "Production", cost: 800, stock: 150, min: 40, max: 500, supplier: 2 },
    IngredientRow { sku: "VER-TOM-01", name: "Tomato (slice)", category: "Produce", cost: 150, stock: 200, min: 50, max: 500, supplier: 0 },
    IngredientRow { sku: "PAN-001", name: "Artisan brioche bun", category: "Bakery", cost: 1200, stock: 45, min: 24, max: 100, supplier: 0 },
    IngredientRow { sku: "LIC-001", name: "Aged rum (750ml bottle)", category: "Spirits", cost: 65000, stock: 4, min: 2, max: 12, supplier: 0 },
    IngredientRow { sku: "PRD-SAL-01", name: "House sauce (200g bag)", category: "Sauces", cost: 2500, stock: 30, min: 10, max: 60, supplier: 0 },
    IngredientRow { sku: "PRD-POS-01", name: "Chocolate lava cake base", category: "Production", cost: 4500, stock: 15, min: 5, max: 40, supplier: 0 },
];

/// Create the demo data, writing ingredients through `ledger`.
pub fn load<S: EventStore>(ledger: &mut InventoryLedger<S>) -> Result<SeedData, SeedError> {
    let mut suppliers = SupplierDirectory::new();
    let supplier_ids: Vec<SupplierId> = [
        ("El Granero Distributors", "Carlos Ruiz", "3001234567", "sales@elgranero.com"),
        ("Carnes Premium SAS", "Ana Torres", "3109876543", "ana@carnespremium.com"),
        ("Lácteos del Valle", "Jorge Perez", "3154567890", "orders@lacteosvalle.com"),
    ]
    .into_iter()
    .map(|(name, contact, phone, email)| -> Result<SupplierId, DomainError> {
        let id = SupplierId::new();
        suppliers.register(Supplier {
            id,
            name: name.to_string(),
            contact_name: contact.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        })?;
        Ok(id)
    })
    .collect::<Result<_, _>>()?;

    let mut ingredients = BTreeMap::new();
    for row in &INGREDIENTS {
        let created = ledger.create_ingredient(NewIngredient {
            sku: row.sku.to_string(),
            name: row.name.to_string(),
            category: row.category.to_string(),
            unit: UnitOfMeasure::Unit,
            initial_cost: Decimal::from(row.cost),
            initial_stock: Decimal::from(row.stock),
            min_stock: Decimal::from(row.min),
            max_stock: Decimal::from(row.max),
            supplier_id: supplier_ids.get(row.supplier).copied(),
        })?;
        ingredients.insert(row.sku, created.id_typed());
    }

    // The patties carry a short kardex: the weekly production batch, one
    // table's sale and a count correction down to 85 on hand.
    let patty = ingredients
        .get("PRD-CAR-01")
        .copied()
        .ok_or_else(|| DomainError::not_found("seed ingredient PRD-CAR-01"))?;
    let now = Utc::now();
    for request in [
        TransactionRequest::purchase(patty, Decimal::from(100), Decimal::from(5800), "Admin")
            .with_notes("Weekly production")
            .at(now - Duration::days(2)),
        TransactionRequest::sale(patty, Decimal::from(2), "System")
            .with_notes("Table 1")
            .at(now - Duration::hours(1)),
        TransactionRequest::adjustment(patty, Decimal::from(13), StockDirection::Out, "Admin")
            .with_notes("Physical count")
            .at(now),
    ] {
        ledger.record_transaction(request)?;
    }

    let recipe = |lines: &[(&'static str, i64)]| -> Result<Option<Recipe>, DomainError> {
        let lines = lines
            .iter()
            .map(|(sku, qty)| -> Result<RecipeLine, DomainError> {
                let ingredient_id = *ingredients
                    .get(sku)
                    .ok_or_else(|| DomainError::not_found(format!("seed ingredient {sku}")))?;
                Ok(RecipeLine {
                    ingredient_id,
                    quantity: Decimal::from(*qty),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Recipe::new(lines)?))
    };

    let dish_rows: [(&'static str, &str, i64, MenuCategory, Option<Recipe>); 7] = [
        (
            "Artisan burger",
            "200g angus beef, paipa cheese, bacon and fresh vegetables on a brioche bun.",
            32000,
            MenuCategory::Mains,
            recipe(&[("PRD-CAR-01", 1), ("PAN-001", 1), ("PRD-LAC-01", 2)])?,
        ),
        ("Pasta carbonara", "Classic Italian recipe with guanciale, pecorino and egg yolk.", 28000, MenuCategory::Mains, None),
        ("Beef carpaccio", "Thin slices of tenderloin with capers, parmesan and rocket.", 24000, MenuCategory::Starters, None),
        ("Coconut lemonade", "Refreshing drink with natural coconut milk.", 12000, MenuCategory::Drinks, None),
        (
            "Chocolate lava cake",
            "Warm chocolate sponge with a molten centre, served with ice cream.",
            18000,
            MenuCategory::Desserts,
            recipe(&[("PRD-POS-01", 1)])?,
        ),
        ("Classic mojito", "White rum, fresh mint, lime and soda.", 22000, MenuCategory::Drinks, None),
        ("Argentine churrasco", "300g butterfly-cut steak from the grill with chimichurri.", 45000, MenuCategory::Mains, None),
    ];

    let mut menu = Menu::new();
    let mut dishes = BTreeMap::new();
    for (name, description, price, category, recipe) in dish_rows {
        let id = MenuItemId::new();
        menu.add(MenuItem {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::from(price),
            tax_rate: Decimal::new(8, 2),
            category,
            is_available: true,
            recipe,
        })?;
        dishes.insert(name, id);
    }

    let burger = dishes
        .get("Artisan burger")
        .copied()
        .ok_or_else(|| DomainError::not_found("seed dish Artisan burger"))?;
    let promotions = vec![
        Promotion {
            id: PromotionId::new(),
            name: "Wednesday 2x1 burgers".to_string(),
            description: Some("Buy one burger, the second is free.".to_string()),
            kind: PromotionKind::TwoForOne,
            active_days: vec![Weekday::Wed],
            target_category: None,
            target_products: BTreeSet::from([burger]),
            is_active: true,
        },
        Promotion {
            id: PromotionId::new(),
            name: "Cocktail happy hour 20%".to_string(),
            description: Some("20% off all drinks.".to_string()),
            kind: PromotionKind::Percentage(Decimal::from(20)),
            active_days: vec![Weekday::Thu, Weekday::Fri, Weekday::Sat],
            target_category: Some(MenuCategory::Drinks),
            target_products: BTreeSet::new(),
            is_active: true,
        },
    ];
    for p in &promotions {
        p.validate()?;
    }

    let mut expenses = ExpenseBook::new();
    for (description, amount, category, method, days_ago, by) in [
        ("Electricity bill", 450_000, ExpenseCategory::Services, PaymentMethod::Transfer, 5, "Admin"),
        ("Extra ice", 25_000, ExpenseCategory::Other, PaymentMethod::Cash, 1, "Cashier"),
        ("Fridge maintenance", 120_000, ExpenseCategory::Maintenance, PaymentMethod::Transfer, 10, "Admin"),
    ] {
        expenses.record(Expense {
            id: ExpenseId::new(),
            description: description.to_string(),
            amount: Decimal::from(amount),
            category,
            payment_method: method,
            date: now - Duration::days(days_ago),
            registered_by: by.to_string(),
        })?;
    }

    let weekly_sales: [(&str, i64, u32); 7] = [
        ("Mon", 1_200_000, 24),
        ("Tue", 1_450_000, 30),
        ("Wed", 1_100_000, 22),
        ("Thu", 1_800_000, 35),
        ("Fri", 2_500_000, 48),
        ("Sat", 3_200_000, 60),
        ("Sun", 2_900_000, 55),
    ];
    let weekly_sales = weekly_sales
        .into_iter()
        .map(|(name, sales, orders)| DailyStat {
            name: name.to_string(),
            sales: Decimal::from(sales),
            orders,
        })
        .collect();

    Ok(SeedData {
        suppliers,
        ingredients,
        menu,
        dishes,
        promotions,
        expenses,
        weekly_sales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoflow_core::TenantId;
    use restoflow_inventory::NegativeStockPolicy;

    #[test]
    fn seeds_a_consistent_restaurant() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let seed = load(&mut ledger).unwrap();

        assert_eq!(ledger.ingredients().len(), 7);
        assert_eq!(seed.menu.len(), 7);
        assert_eq!(seed.suppliers.len(), 3);
        assert_eq!(seed.promotions.len(), 2);
        assert_eq!(seed.weekly_sales.len(), 7);
        assert_eq!(seed.expenses.total(), Decimal::from(595_000));

        let patty = ledger.find_by_sku("PRD-CAR-01").unwrap();
        assert_eq!(seed.suppliers.display_name(patty.supplier_id()), "Carnes Premium SAS");
        assert_eq!(patty.current_stock(), Decimal::from(85));
        assert_eq!(ledger.ledger(&patty.id_typed()).unwrap().count(), 3);
        assert_eq!(ledger.replay_stock(&patty.id_typed()).unwrap(), Decimal::from(85));
        assert_eq!(ledger.purchases_total(), Decimal::from(580_000));

        let burger = seed.menu.get(&seed.dishes["Artisan burger"]).unwrap();
        assert_eq!(burger.recipe.as_ref().map(|r| r.lines().len()), Some(3));
    }

    #[test]
    fn seeding_twice_hits_duplicate_sku() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        load(&mut ledger).unwrap();
        assert!(matches!(
            load(&mut ledger),
            Err(SeedError::Ledger(LedgerError::DuplicateSku(_)))
        ));
    }
}
