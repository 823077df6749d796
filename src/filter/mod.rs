//! Row filtering.
//!
//! A [`FilterSpec`] holds, per column, an optional value set, an optional
//! condition and an optional free-text filter, plus a global search string
//! and a popular filter on the product column. Everything that is active
//! composes with logical AND.
//!
//! Value sets are classified against the domain of the rows being filtered:
//! a set covering every value is treated as off, an empty set hides
//! everything.

mod condition;
mod popular;
mod value_set;

pub use condition::{Condition, ConditionOperator};
pub use popular::{best_seller_rank, PopularContext, PopularFilter};
pub use value_set::{column_domain, column_value, value_set_mode, ValueSetMode};

use crate::config::{BestSellerEntry, PlanningConfig};
use crate::model::{Column, ProductRow, RowIndex, RowSearchKey};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Filters on one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFilter {
    /// Checkbox selection of display values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeSet<String>>,
    /// Operator condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Case-insensitive substring on the display value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ColumnFilter {
    pub fn is_empty(&self) -> bool {
        self.values.is_none()
            && self.condition.is_none()
            && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

/// Complete filter state of the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Substring matched against id, brand, product and size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub columns: IndexMap<Column, ColumnFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular: Option<PopularFilter>,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_mut(&mut self, column: Column) -> &mut ColumnFilter {
        self.columns.entry(column).or_default()
    }

    #[must_use]
    pub fn with_values<I, S>(mut self, column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_mut(column).values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, column: Column, condition: Condition) -> Self {
        self.column_mut(column).condition = Some(condition);
        self
    }

    #[must_use]
    pub fn with_text(mut self, column: Column, text: impl Into<String>) -> Self {
        self.column_mut(column).text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub const fn with_popular(mut self, popular: PopularFilter) -> Self {
        self.popular = Some(popular);
        self
    }

    /// Remove every filter on a column.
    pub fn clear_column(&mut self, column: &Column) {
        self.columns.shift_remove(column);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether anything would be filtered at all.
    pub fn is_active(&self) -> bool {
        self.popular.is_some()
            || self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.columns.values().any(|c| !c.is_empty())
    }

    /// Drop column entries that no longer hold any filter.
    pub fn prune(&mut self) {
        self.columns.retain(|_, c| !c.is_empty());
    }
}

/// Everything outside the rows that filters read.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Row keys currently added to the shipment
    pub checked: &'a BTreeSet<String>,
    pub overstock_threshold_days: f64,
    pub low_stock_days: f64,
    pub best_sellers: &'a [BestSellerEntry],
    /// Precomputed search keys, looked up by original index
    pub index: Option<&'a RowIndex>,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        checked: &'a BTreeSet<String>,
        planning: &PlanningConfig,
        best_sellers: &'a [BestSellerEntry],
    ) -> Self {
        Self {
            checked,
            overstock_threshold_days: planning.overstock_threshold_days,
            low_stock_days: planning.low_stock_days,
            best_sellers,
            index: None,
        }
    }

    #[must_use]
    pub const fn with_index(mut self, index: &'a RowIndex) -> Self {
        self.index = Some(index);
        self
    }

    const fn popular(&self) -> PopularContext<'a> {
        PopularContext {
            overstock_threshold_days: self.overstock_threshold_days,
            low_stock_days: self.low_stock_days,
            best_sellers: self.best_sellers,
        }
    }
}

/// A column filter with its value set already classified.
struct PreparedColumn<'s> {
    column: &'s Column,
    values: Option<(&'s BTreeSet<String>, ValueSetMode)>,
    condition: Option<&'s Condition>,
    text: Option<String>,
}

impl PreparedColumn<'_> {
    fn matches(&self, row: &ProductRow, checked: &BTreeSet<String>) -> bool {
        let needs_value = self.text.is_some()
            || self.condition.is_some()
            || matches!(self.values, Some((_, ValueSetMode::Members)));
        if !needs_value {
            return !matches!(self.values, Some((_, ValueSetMode::MatchNone)));
        }

        if let Some((selected, mode)) = self.values {
            match mode {
                ValueSetMode::MatchNone => return false,
                ValueSetMode::Members => {
                    if !selected.contains(&column_value(row, self.column, checked)) {
                        return false;
                    }
                }
                ValueSetMode::Inactive => {}
            }
        }

        if let Some(ref needle) = self.text {
            if !column_value(row, self.column, checked)
                .to_lowercase()
                .contains(needle.as_str())
            {
                return false;
            }
        }

        if let Some(condition) = self.condition {
            let cell = match self.column {
                Column::Field(field) => row.get(field),
                Column::Added => {
                    crate::model::FieldValue::Text(column_value(row, self.column, checked))
                }
            };
            if !condition.matches(&cell, self.column.is_numeric()) {
                return false;
            }
        }

        true
    }
}

/// Filter `rows` by `spec`, preserving order.
pub fn apply<'r>(
    rows: &'r [ProductRow],
    spec: &FilterSpec,
    ctx: &FilterContext<'_>,
) -> Vec<&'r ProductRow> {
    let prepared: Vec<PreparedColumn<'_>> = spec
        .columns
        .iter()
        .filter(|(_, f)| !f.is_empty())
        .map(|(column, f)| PreparedColumn {
            column,
            values: f.values.as_ref().map(|selected| {
                let domain = column_domain(rows, column, ctx.checked);
                (selected, value_set_mode(selected, &domain))
            }),
            condition: f.condition.as_ref(),
            text: f
                .text
                .as_deref()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        })
        .collect();

    let search = spec
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let popular = ctx.popular();

    let kept: Vec<&ProductRow> = rows
        .iter()
        .filter(|row| {
            if let Some(ref query) = search {
                let indexed = ctx.index.zip(row.original_index).and_then(|(index, original)| {
                    index
                        .position_of_original(original)
                        .and_then(|pos| index.search_key(pos))
                });
                let key = indexed.map_or_else(
                    || Cow::Owned(RowSearchKey::from_row(row)),
                    Cow::Borrowed,
                );
                if !key.contains(query) {
                    return false;
                }
            }
            if let Some(kind) = spec.popular {
                if !kind.matches(row, &popular) {
                    return false;
                }
            }
            prepared.iter().all(|p| p.matches(row, ctx.checked))
        })
        .collect();

    tracing::debug!(
        input = rows.len(),
        output = kept.len(),
        columns = prepared.len(),
        "applied filters"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_best_sellers;
    use crate::model::Field;

    fn rows() -> Vec<ProductRow> {
        vec![
            ProductRow::new()
                .with("id", "A")
                .with("brand", "The Plant Shoppe")
                .with("product", "Indoor Plant Food")
                .with("size", "8oz")
                .with("totalInventory", 0)
                .with("sales30Day", 12),
            ProductRow::new()
                .with("id", "B")
                .with("brand", "Acme")
                .with("product", "Cactus Soil")
                .with("size", "1 quart")
                .with("totalInventory", 40)
                .with("doiTotal", 250),
            ProductRow::new()
                .with("id", "C")
                .with("brand", "Acme")
                .with("product", "Worm Castings")
                .with("size", "1 lb")
                .with("totalInventory", 5)
                .with("doiTotal", 10)
                .with("sales7Day", 3),
        ]
    }

    fn ids(rows: &[&ProductRow]) -> Vec<String> {
        rows.iter().map(|r| r.key()).collect()
    }

    fn run(rows: &[ProductRow], spec: &FilterSpec, checked: &BTreeSet<String>) -> Vec<String> {
        let best = default_best_sellers();
        let ctx = FilterContext::new(checked, &PlanningConfig::default(), &best);
        ids(&apply(rows, spec, &ctx))
    }

    #[test]
    fn test_brand_contains() {
        let spec = FilterSpec::new().with_condition(
            Column::Field(Field::Brand),
            Condition::new(ConditionOperator::Contains, "shop"),
        );
        assert_eq!(run(&rows(), &spec, &BTreeSet::new()), vec!["A"]);
    }

    #[test]
    fn test_full_domain_value_set_is_noop() {
        let spec =
            FilterSpec::new().with_values(Column::Field(Field::Brand), ["Acme", "The Plant Shoppe"]);
        assert_eq!(run(&rows(), &spec, &BTreeSet::new()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_value_set_matches_nothing() {
        let spec = FilterSpec::new().with_values(Column::Field(Field::Brand), Vec::<String>::new());
        assert!(run(&rows(), &spec, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_added_value_set() {
        let checked: BTreeSet<String> = ["B".to_string()].into();
        let spec = FilterSpec::new().with_values(Column::Added, ["Added"]);
        assert_eq!(run(&rows(), &spec, &checked), vec!["B"]);
        let spec = FilterSpec::new().with_values(Column::Added, ["Not Added"]);
        assert_eq!(run(&rows(), &spec, &checked), vec!["A", "C"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let spec = FilterSpec::new()
            .with_values(Column::Field(Field::Brand), ["Acme"])
            .with_condition(
                Column::Field(Field::Inventory),
                Condition::new(ConditionOperator::GreaterThan, "10"),
            );
        assert_eq!(run(&rows(), &spec, &BTreeSet::new()), vec!["B"]);
    }

    #[test]
    fn test_search_and_text_filter() {
        let spec = FilterSpec::new().with_search("  WORM ");
        assert_eq!(run(&rows(), &spec, &BTreeSet::new()), vec!["C"]);
        let spec = FilterSpec::new().with_text(Column::Field(Field::Size), "QUART");
        assert_eq!(run(&rows(), &spec, &BTreeSet::new()), vec!["B"]);
    }

    #[test]
    fn test_search_uses_index() {
        let annotated = crate::pipeline::annotate(&rows());
        let index = RowIndex::build(&annotated);
        let best = default_best_sellers();
        let checked = BTreeSet::new();
        let ctx = FilterContext::new(&checked, &PlanningConfig::default(), &best).with_index(&index);
        let spec = FilterSpec::new().with_search("cactus");
        assert_eq!(ids(&apply(&annotated, &spec, &ctx)), vec!["B"]);
    }

    #[test]
    fn test_popular_filters() {
        let data = rows();
        let none = BTreeSet::new();
        let spec = FilterSpec::new().with_popular(PopularFilter::SoldOut);
        assert_eq!(run(&data, &spec, &none), vec!["A"]);
        let spec = FilterSpec::new().with_popular(PopularFilter::NoSalesHistory);
        assert_eq!(run(&data, &spec, &none), vec!["B"]);
        let spec = FilterSpec::new().with_popular(PopularFilter::Overstock);
        assert_eq!(run(&data, &spec, &none), vec!["B"]);
        let spec = FilterSpec::new().with_popular(PopularFilter::LowStock);
        assert_eq!(run(&data, &spec, &none), vec!["C"]);
        let spec = FilterSpec::new().with_popular(PopularFilter::BestSellers);
        assert_eq!(run(&data, &spec, &none), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_spec_housekeeping() {
        let mut spec = FilterSpec::new().with_text(Column::Field(Field::Brand), " ");
        assert!(!spec.is_active());
        spec.prune();
        assert!(spec.columns.is_empty());

        let mut spec = FilterSpec::new().with_search("x").with_popular(PopularFilter::Overstock);
        assert!(spec.is_active());
        spec.clear();
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn test_spec_serde() {
        let spec = FilterSpec::new()
            .with_values(Column::Added, ["Added"])
            .with_condition(
                Column::Field(Field::DaysOfInventory),
                Condition::between("10", "20"),
            );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["columns"]["doi"]["condition"]["operator"], "between");
        let back: FilterSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
