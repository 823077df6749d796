//! Property-based tests for rounding, loading, filtering and ordering.

use proptest::prelude::*;
use shipment_planner::filter::{self, column_domain, FilterContext, FilterSpec};
use shipment_planner::config::{default_best_sellers, PlanningConfig};
use shipment_planner::model::{Column, Field, ProductRow};
use shipment_planner::order::{self, OrderContext, OrderState, SortDirection, SortSpec};
use shipment_planner::pipeline::{annotate, parse_rows};
use shipment_planner::quantity::{round_down, round_nearest, round_up, step_down, step_up};
use std::collections::BTreeSet;

fn rows_strategy() -> impl Strategy<Value = Vec<ProductRow>> {
    prop::collection::vec(
        (
            "[A-Z]{1,3}-[0-9]{1,3}",
            prop::sample::select(vec!["Acme", "Zed", "The Plant Shoppe", ""]),
            0i64..500,
            0i64..100,
        ),
        0..40,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(id, brand, inventory, sales)| {
                ProductRow::new()
                    .with("id", id)
                    .with("brand", brand)
                    .with("totalInventory", inventory)
                    .with("sales30Day", sales)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rounding_lands_on_multiples(value in 1i64..100_000, increment in 2i64..500) {
        let up = round_up(value, increment);
        let down = round_down(value, increment);
        let nearest = round_nearest(value, increment);

        prop_assert_eq!(up % increment, 0);
        prop_assert_eq!(down % increment, 0);
        prop_assert_eq!(nearest % increment, 0);
        prop_assert!(down <= value && value <= up);
        prop_assert!(up - down <= increment);
        prop_assert!(nearest == up || nearest == down);
    }

    #[test]
    fn steps_move_strictly(value in 0i64..100_000, increment in 1i64..500) {
        let up = step_up(value, increment);
        prop_assert!(up > value);
        prop_assert_eq!(up % increment, 0);
        prop_assert!(up - value <= increment);

        let down = step_down(value, increment);
        prop_assert!(down >= 0);
        prop_assert_eq!(down % increment, 0);
        if value > 0 {
            prop_assert!(down < value);
        }
    }

    #[test]
    fn parse_rows_doesnt_panic(s in "\\PC{0,500}") {
        let _ = parse_rows(&s);
    }

    #[test]
    fn annotation_is_idempotent(rows in rows_strategy()) {
        let once = annotate(&rows);
        let twice = annotate(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn full_domain_value_set_is_a_no_op(rows in rows_strategy()) {
        let rows = annotate(&rows);
        let checked = BTreeSet::new();
        let planning = PlanningConfig::default();
        let best = default_best_sellers();
        let ctx = FilterContext::new(&checked, &planning, &best);

        let column = Column::Field(Field::Brand);
        let domain = column_domain(&rows, &column, &checked);
        let spec = FilterSpec::new().with_values(column, domain);

        let all: Vec<&ProductRow> = rows.iter().collect();
        prop_assert_eq!(filter::apply(&rows, &spec, &ctx), all);
    }

    #[test]
    fn live_sort_is_a_permutation(rows in rows_strategy(), desc in any::<bool>()) {
        let rows = annotate(&rows);
        let checked = BTreeSet::new();
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        let state = OrderState::LiveSort(SortSpec::new(Field::Inventory, direction));
        let ctx = OrderContext { checked: &checked, best_seller_ranks: None };

        let sorted = order::apply(rows.iter().collect(), &state, &ctx);
        prop_assert_eq!(sorted.len(), rows.len());

        let mut before: Vec<usize> = rows.iter().filter_map(|r| r.original_index).collect();
        let mut after: Vec<usize> = sorted.iter().filter_map(|r| r.original_index).collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn captured_order_keeps_captured_rows_first(rows in rows_strategy(), extra in "[a-z]{4,8}") {
        let rows = annotate(&rows);
        let captured: Vec<String> = rows.iter().rev().map(ProductRow::key).collect();
        let state = OrderState::CapturedOrder(captured.clone());
        let checked = BTreeSet::new();
        let ctx = OrderContext { checked: &checked, best_seller_ranks: None };

        let mut with_new = rows.clone();
        with_new.push(ProductRow::new().with("id", format!("new-{extra}")));
        let with_new = annotate(&with_new);

        let ordered = order::apply(with_new.iter().collect(), &state, &ctx);
        let last = ordered.last().map(|r| r.key());
        prop_assert_eq!(last, Some(format!("new-{extra}")));
    }
}
