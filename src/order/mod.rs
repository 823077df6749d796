//! Row ordering: live sort, captured order and the default order.
//!
//! The table is in exactly one [`OrderState`]. A live sort is re-evaluated
//! on every pass; a captured order is the key list a one-shot sort produced
//! and stays fixed until a new sort or a reset. While the Best Sellers
//! popular filter is active its ranking replaces whatever the state says.

use crate::model::{Column, ProductRow};
use crate::filter::column_value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "up" => Ok(Self::Asc),
            "desc" | "descending" | "down" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Column plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<Column>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Ordering state of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum OrderState {
    /// Default order
    #[default]
    NoOrder,
    /// Re-sorted on every pass
    LiveSort(SortSpec),
    /// Row keys frozen by a one-shot sort
    CapturedOrder(Vec<String>),
}

impl OrderState {
    /// A new live sort replaces any capture.
    pub fn sort_by(&mut self, spec: SortSpec) {
        *self = Self::LiveSort(spec);
    }

    /// Freeze `keys` as the order.
    pub fn capture(&mut self, keys: Vec<String>) {
        *self = Self::CapturedOrder(keys);
    }

    pub fn reset(&mut self) {
        *self = Self::NoOrder;
    }

    pub const fn live_spec(&self) -> Option<&SortSpec> {
        match self {
            Self::LiveSort(spec) => Some(spec),
            _ => None,
        }
    }

    pub const fn is_captured(&self) -> bool {
        matches!(self, Self::CapturedOrder(_))
    }
}

/// Inputs to ordering besides the rows themselves.
#[derive(Debug, Clone, Copy)]
pub struct OrderContext<'a> {
    /// Used when sorting by the added column
    pub checked: &'a BTreeSet<String>,
    /// Best-seller rank per row key; `Some` while Best Sellers is active
    pub best_seller_ranks: Option<&'a HashMap<String, usize>>,
}

/// Order `rows` according to `state`, with Best Sellers taking precedence.
pub fn apply<'r>(
    mut rows: Vec<&'r ProductRow>,
    state: &OrderState,
    ctx: &OrderContext<'_>,
) -> Vec<&'r ProductRow> {
    if let Some(ranks) = ctx.best_seller_ranks {
        rows.sort_by_key(|row| ranks.get(&row.key()).copied().unwrap_or(usize::MAX));
        return rows;
    }

    match state {
        OrderState::NoOrder => default_order(rows),
        OrderState::LiveSort(spec) => {
            live_sort(&mut rows, spec, ctx.checked);
            rows
        }
        OrderState::CapturedOrder(keys) => reproject(rows, keys),
    }
}

/// Rows with sales history first, in arrival order, then the rest.
pub fn default_order(rows: Vec<&ProductRow>) -> Vec<&ProductRow> {
    let (mut selling, idle): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|row| row.has_sales_history());
    selling.extend(idle);
    selling
}

/// Stable sort by one column.
///
/// Numeric columns compare numerically, and in ascending order rows whose
/// value is exactly zero come before everything else. Text columns compare
/// case-insensitively.
pub fn live_sort(rows: &mut [&ProductRow], spec: &SortSpec, checked: &BTreeSet<String>) {
    match &spec.column {
        Column::Field(field) if field.is_numeric() => {
            let mut keyed: Vec<(f64, &ProductRow)> =
                rows.iter().map(|row| (row.number(field), *row)).collect();
            keyed.sort_by(|(a, _), (b, _)| compare_numbers(*a, *b, spec.direction));
            for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
                *slot = row;
            }
        }
        column => {
            let mut keyed: Vec<(String, &ProductRow)> = rows
                .iter()
                .map(|row| (column_value(row, column, checked).to_lowercase(), *row))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match spec.direction {
                SortDirection::Asc => a.cmp(b),
                SortDirection::Desc => b.cmp(a),
            });
            for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
                *slot = row;
            }
        }
    }
}

fn compare_numbers(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => (a != 0.0).cmp(&(b != 0.0)).then(a.total_cmp(&b)),
        SortDirection::Desc => b.total_cmp(&a),
    }
}

/// Put rows into the captured key order; rows the capture does not know
/// follow in arrival order.
pub fn reproject<'r>(rows: Vec<&'r ProductRow>, keys: &[String]) -> Vec<&'r ProductRow> {
    let position: HashMap<&str, usize> = keys
        .iter()
        .enumerate()
        .rev()
        .map(|(i, k)| (k.as_str(), i))
        .collect();

    let mut known = Vec::with_capacity(rows.len());
    let mut unknown = Vec::new();
    for row in rows {
        match position.get(row.key().as_str()) {
            Some(&pos) => known.push((pos, row)),
            None => unknown.push(row),
        }
    }
    known.sort_by_key(|(pos, _)| *pos);

    known
        .into_iter()
        .map(|(_, row)| row)
        .chain(unknown)
        .collect()
}

/// Keys of `rows` in their current order.
pub fn keys_of(rows: &[&ProductRow]) -> Vec<String> {
    rows.iter().map(|row| row.key()).collect()
}
