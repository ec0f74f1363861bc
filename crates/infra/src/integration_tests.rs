//! End-to-end tests for the inventory pipeline.
//!
//! Command → EventStore → projections → ledger queries, plus the menu and
//! order flows that sit on top of seeded stock.

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc, Weekday};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use restoflow_core::TenantId;
    use restoflow_inventory::{
        IngredientId, NegativeStockPolicy, StockDirection, TransactionType, UnitOfMeasure,
    };
    use restoflow_sales::{Order, OrderId, OrderLine, PromotionEvaluator, PromotionOutcome};

    use crate::ledger::{InventoryLedger, LedgerError, NewIngredient, TransactionRequest};
    use crate::seed;

    fn ingredient(sku: &str, cost: Decimal, stock: Decimal) -> NewIngredient {
        NewIngredient {
            sku: sku.to_string(),
            name: format!("Ingredient {sku}"),
            category: "Production".to_string(),
            unit: UnitOfMeasure::Unit,
            initial_cost: cost,
            initial_stock: stock,
            min_stock: dec!(10),
            max_stock: dec!(200),
            supplier_id: None,
        }
    }

    fn ledger_with(policy: NegativeStockPolicy, stock: Decimal) -> (InventoryLedger, IngredientId) {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), policy);
        let id = ledger
            .create_ingredient(ingredient("PRD-CAR-01", dec!(5800), stock))
            .unwrap()
            .id_typed();
        (ledger, id)
    }

    #[test]
    fn purchase_revises_cost_and_sale_keeps_it() {
        let (mut ledger, id) = ledger_with(NegativeStockPolicy::Reject, dec!(100));

        let bought = ledger
            .record_transaction(TransactionRequest::purchase(id, dec!(50), dec!(6000), "Admin"))
            .unwrap();
        assert_eq!(bought.ingredient.current_stock(), dec!(150));
        assert_eq!(bought.ingredient.cost().round_dp(2), dec!(5866.67));

        let sold = ledger
            .record_transaction(TransactionRequest::sale(id, dec!(2), "System").with_notes("Table 1"))
            .unwrap();
        assert_eq!(sold.transaction.quantity(), dec!(-2));
        assert_eq!(sold.transaction.unit_cost(), bought.ingredient.cost());
        assert_eq!(sold.ingredient.cost(), bought.ingredient.cost());
        assert_eq!(sold.ingredient.current_stock(), dec!(148));
    }

    #[test]
    fn ledger_lists_newest_first_with_ties_in_recording_order() {
        let (mut ledger, id) = ledger_with(NegativeStockPolicy::Reject, dec!(100));
        let base = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();

        let early = ledger
            .record_transaction(TransactionRequest::waste(id, dec!(1), "Cook").at(base))
            .unwrap();
        let late = ledger
            .record_transaction(
                TransactionRequest::sale(id, dec!(1), "System").at(base + Duration::hours(2)),
            )
            .unwrap();
        // Backdated entries still land in date order.
        let tie_a = ledger
            .record_transaction(
                TransactionRequest::adjustment(id, dec!(3), StockDirection::In, "Admin")
                    .at(base + Duration::hours(1)),
            )
            .unwrap();
        let tie_b = ledger
            .record_transaction(
                TransactionRequest::transfer(id, dec!(2), "Admin").at(base + Duration::hours(1)),
            )
            .unwrap();

        let ids: Vec<_> = ledger.ledger(&id).unwrap().map(|tx| tx.id()).collect();
        assert_eq!(
            ids,
            vec![
                late.transaction.id(),
                tie_b.transaction.id(),
                tie_a.transaction.id(),
                early.transaction.id(),
            ]
        );
    }

    #[test]
    fn ledger_iterator_can_be_restarted() {
        let (mut ledger, id) = ledger_with(NegativeStockPolicy::Reject, dec!(10));
        for _ in 0..3 {
            ledger
                .record_transaction(TransactionRequest::sale(id, dec!(1), "System"))
                .unwrap();
        }

        let iter = ledger.ledger(&id).unwrap();
        assert_eq!(iter.len(), 3);
        let first_pass: Vec<_> = iter.clone().map(|tx| tx.id()).collect();
        let second_pass: Vec<_> = iter.map(|tx| tx.id()).collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn clamped_sale_records_what_was_actually_removed() {
        let (mut ledger, id) = ledger_with(NegativeStockPolicy::ClampToZero, dec!(3));

        let recorded = ledger
            .record_transaction(TransactionRequest::sale(id, dec!(5), "System"))
            .unwrap();
        assert_eq!(recorded.transaction.quantity(), dec!(-3));
        assert_eq!(recorded.ingredient.current_stock(), Decimal::ZERO);
        assert_eq!(ledger.replay_stock(&id).unwrap(), Decimal::ZERO);

        let err = ledger
            .record_transaction(TransactionRequest::sale(id, dec!(1), "System"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
    }

    #[test]
    fn allow_policy_goes_negative_and_next_purchase_takes_incoming_cost() {
        let (mut ledger, id) = ledger_with(NegativeStockPolicy::Allow, dec!(2));

        let sold = ledger
            .record_transaction(TransactionRequest::sale(id, dec!(5), "System"))
            .unwrap();
        assert_eq!(sold.ingredient.current_stock(), dec!(-3));

        let bought = ledger
            .record_transaction(TransactionRequest::purchase(id, dec!(10), dec!(6200), "Admin"))
            .unwrap();
        assert_eq!(bought.ingredient.current_stock(), dec!(7));
        assert_eq!(bought.ingredient.cost(), dec!(6200));
    }

    #[test]
    fn consume_recipe_is_all_or_nothing_under_reject() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let data = seed::load(&mut ledger).unwrap();
        let burger = data.menu.get(&data.dishes["Artisan burger"]).unwrap();
        let recipe = burger.recipe.clone().unwrap();

        let bun = data.ingredients["PAN-001"];
        let patty = data.ingredients["PRD-CAR-01"];
        let before = ledger.valuation();
        let patty_history = ledger.ledger(&patty).unwrap().count();

        // 45 buns on hand; 50 burgers cannot be made.
        let err = ledger.consume_recipe(&recipe, 50, "System", None).unwrap_err();
        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert_eq!(ledger.ledger(&patty).unwrap().count(), patty_history);
        assert_eq!(ledger.valuation(), before);

        let recorded = ledger
            .consume_recipe(&recipe, 2, "System", Some("Order #1"))
            .unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded.iter().all(|r| r.transaction.kind() == TransactionType::Sale));
        assert_eq!(ledger.ingredient(&bun).unwrap().current_stock(), dec!(43));
        assert_eq!(
            ledger.ingredient(&data.ingredients["PRD-LAC-01"]).unwrap().current_stock(),
            dec!(146)
        );
    }

    #[test]
    fn seeded_valuation_and_low_stock() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let data = seed::load(&mut ledger).unwrap();

        // 5800*85 + 800*150 + 150*200 + 1200*45 + 65000*4 + 2500*30 + 4500*15
        assert_eq!(ledger.valuation(), dec!(1099500));
        assert!(ledger.low_stock().is_empty());

        let rum = data.ingredients["LIC-001"];
        ledger
            .record_transaction(TransactionRequest::waste(rum, dec!(2), "Bartender"))
            .unwrap();
        let low: Vec<_> = ledger.low_stock().iter().map(|i| i.sku().to_string()).collect();
        assert_eq!(low, vec!["LIC-001".to_string()]);
        assert_eq!(ledger.categories().len(), 5);
    }

    #[test]
    fn seeded_order_with_wednesday_burgers() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let data = seed::load(&mut ledger).unwrap();
        let burger = data.menu.orderable(&data.dishes["Artisan burger"]).unwrap();
        let lemonade = data.menu.orderable(&data.dishes["Coconut lemonade"]).unwrap();

        let mut order = Order::new(OrderId::new());
        order.add_line(OrderLine::for_item(burger, 2).unwrap()).unwrap();
        order.add_line(OrderLine::for_item(lemonade, 2).unwrap()).unwrap();

        let eval = PromotionEvaluator::default();
        let two_for_one = &data.promotions[0];
        assert!(!order.apply_promotion(two_for_one, &eval, Weekday::Tue).is_applied());
        assert_eq!(
            order.apply_promotion(two_for_one, &eval, Weekday::Wed),
            PromotionOutcome::Applied { discount: dec!(32000) }
        );

        let totals = order.totals(&eval, dec!(0.08), Decimal::ZERO);
        assert_eq!(totals.taxable, dec!(56000));
        assert_eq!(totals.tax, dec!(4480));
        assert_eq!(totals.total, dec!(60480));
    }

    #[test]
    fn seeded_profit_and_loss_counts_purchases_as_cost_of_goods() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let data = seed::load(&mut ledger).unwrap();
        let patty = data.ingredients["PRD-CAR-01"];

        // Only the patty production batch is a purchase: 100 * 5800.
        assert_eq!(ledger.purchases_total(), dec!(580000));
        let history: Vec<_> = ledger.ledger(&patty).unwrap().map(|t| t.kind()).collect();
        assert_eq!(
            history,
            vec![TransactionType::Adjustment, TransactionType::Sale, TransactionType::Purchase]
        );

        let quiet_day = ledger.profit_and_loss(Decimal::ZERO, &data.expenses);
        assert_eq!(quiet_day.total_expenses, dec!(1175000));
        assert_eq!(quiet_day.net_profit, dec!(-1175000));
        assert_eq!(quiet_day.margin_percent, None);
        assert!(!quiet_day.is_profitable());

        ledger
            .record_transaction(TransactionRequest::purchase(patty, dec!(10), dec!(6000), "Admin"))
            .unwrap();
        let report = ledger.profit_and_loss(dec!(2000000), &data.expenses);
        assert_eq!(report.cost_of_goods, dec!(640000));
        assert_eq!(report.net_profit, dec!(765000));
        assert!(report.is_profitable());
    }

    #[test]
    fn rebuild_from_store_matches_live_read_models() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Allow);
        let data = seed::load(&mut ledger).unwrap();
        let patty = data.ingredients["PRD-CAR-01"];
        ledger
            .record_transaction(TransactionRequest::purchase(patty, dec!(40), dec!(6100), "Admin"))
            .unwrap();
        ledger
            .record_transaction(TransactionRequest::sale(patty, dec!(7), "System"))
            .unwrap();

        let live = ledger.ingredient(&patty).cloned().unwrap();
        let live_history: Vec<_> = ledger.ledger(&patty).unwrap().cloned().collect();

        ledger.rebuild().unwrap();
        assert_eq!(ledger.ingredient(&patty), Some(&live));
        let rebuilt: Vec<_> = ledger.ledger(&patty).unwrap().cloned().collect();
        assert_eq!(rebuilt, live_history);
        assert_eq!(ledger.ingredients().len(), 7);
    }

    #[test]
    fn stricter_policy_still_accepts_receipts_into_negative_stock() {
        for policy in [NegativeStockPolicy::Reject, NegativeStockPolicy::ClampToZero] {
            let (mut ledger, id) = ledger_with(NegativeStockPolicy::Allow, dec!(2));
            ledger
                .record_transaction(TransactionRequest::sale(id, dec!(5), "System"))
                .unwrap();
            ledger.set_policy(policy);

            ledger
                .record_transaction(TransactionRequest::purchase(id, dec!(1), dec!(6000), "Admin"))
                .unwrap();
            ledger
                .record_transaction(TransactionRequest::adjustment(
                    id,
                    dec!(1),
                    StockDirection::In,
                    "Admin",
                ))
                .unwrap();
            let received = ledger
                .record_transaction(TransactionRequest::transfer(id, dec!(1), "Admin").incoming())
                .unwrap();
            assert_eq!(received.ingredient.current_stock(), Decimal::ZERO);
            assert_eq!(ledger.replay_stock(&id).unwrap(), Decimal::ZERO);
        }
    }

    #[test]
    fn oversized_adjustment_is_rejected_and_leaves_state_untouched() {
        let (mut ledger, id) = ledger_with(NegativeStockPolicy::Reject, dec!(2));
        let err = ledger
            .record_transaction(TransactionRequest::adjustment(
                id,
                Decimal::MAX,
                StockDirection::In,
                "Admin",
            ))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert_eq!(ledger.ingredient(&id).unwrap().current_stock(), dec!(2));
        assert_eq!(ledger.ledger(&id).unwrap().count(), 0);
    }

    #[derive(Debug, Clone)]
    enum Movement {
        Purchase(u32, u32),
        Sale(u32),
        Waste(u32),
        AdjustIn(u32),
        AdjustOut(u32),
        Transfer(u32),
    }

    fn movement() -> impl Strategy<Value = Movement> {
        prop_oneof![
            (1u32..50, 100u32..10_000).prop_map(|(q, c)| Movement::Purchase(q, c)),
            (1u32..20).prop_map(Movement::Sale),
            (1u32..10).prop_map(Movement::Waste),
            (1u32..10).prop_map(Movement::AdjustIn),
            (1u32..10).prop_map(Movement::AdjustOut),
            (1u32..10).prop_map(Movement::Transfer),
        ]
    }

    fn policy() -> impl Strategy<Value = NegativeStockPolicy> {
        prop_oneof![
            Just(NegativeStockPolicy::Allow),
            Just(NegativeStockPolicy::Reject),
            Just(NegativeStockPolicy::ClampToZero),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Opening balance plus the kardex always equals the live stock,
        /// whatever the policy rejected or clamped along the way.
        #[test]
        fn kardex_replays_to_current_stock(
            opening in 0u32..50,
            policy in policy(),
            moves in prop::collection::vec(movement(), 0..40),
        ) {
            let (mut ledger, id) = ledger_with(policy, Decimal::from(opening));
            for m in moves {
                let request = match m {
                    Movement::Purchase(q, c) => {
                        TransactionRequest::purchase(id, Decimal::from(q), Decimal::from(c), "Admin")
                    }
                    Movement::Sale(q) => TransactionRequest::sale(id, Decimal::from(q), "System"),
                    Movement::Waste(q) => TransactionRequest::waste(id, Decimal::from(q), "Cook"),
                    Movement::AdjustIn(q) => {
                        TransactionRequest::adjustment(id, Decimal::from(q), StockDirection::In, "Admin")
                    }
                    Movement::AdjustOut(q) => {
                        TransactionRequest::adjustment(id, Decimal::from(q), StockDirection::Out, "Admin")
                    }
                    Movement::Transfer(q) => TransactionRequest::transfer(id, Decimal::from(q), "Admin"),
                };
                // Rejections are expected under Reject and ClampToZero.
                let _ = ledger.record_transaction(request);
            }

            let stock = ledger.ingredient(&id).unwrap().current_stock();
            prop_assert_eq!(ledger.replay_stock(&id).unwrap(), stock);
            if policy != NegativeStockPolicy::Allow {
                prop_assert!(stock >= Decimal::ZERO);
            }
        }
    }
}
