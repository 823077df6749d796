//! Curated "popular" filters on the product column.

use crate::config::BestSellerEntry;
use crate::model::{Field, ProductRow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, curated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PopularFilter {
    /// No inventory left but the row is still selling
    SoldOut,
    /// Inventory on hand and no trailing sales
    NoSalesHistory,
    /// Days of inventory above the overstock threshold
    Overstock,
    /// Rows on the ranked best-seller list, in rank order
    BestSellers,
    /// Some inventory, but fewer days than the low-stock threshold
    LowStock,
}

impl PopularFilter {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoldOut => "Sold Out",
            Self::NoSalesHistory => "No Sales History",
            Self::Overstock => "Overstock",
            Self::BestSellers => "Best Sellers",
            Self::LowStock => "Low Stock",
        }
    }
}

impl fmt::Display for PopularFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Thresholds and lists the popular filters read.
#[derive(Debug, Clone, Copy)]
pub struct PopularContext<'a> {
    pub overstock_threshold_days: f64,
    pub low_stock_days: f64,
    pub best_sellers: &'a [BestSellerEntry],
}

impl PopularFilter {
    pub fn matches(self, row: &ProductRow, ctx: &PopularContext<'_>) -> bool {
        match self {
            Self::SoldOut => row.number(&Field::Inventory) == 0.0 && row.has_sales_history(),
            Self::NoSalesHistory => {
                row.number(&Field::Inventory) > 0.0 && !row.has_sales_history()
            }
            Self::Overstock => row.number(&Field::DaysOfInventory) > ctx.overstock_threshold_days,
            Self::BestSellers => best_seller_rank(row, ctx.best_sellers).is_some(),
            Self::LowStock => {
                let doi = row.number(&Field::DaysOfInventory);
                doi > 0.0 && doi < ctx.low_stock_days
            }
        }
    }
}

/// Lowercase and drop whitespace, so "8 oz" and "8oz" compare equal.
fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rank of the row on the best-seller list (0 is best), if listed.
///
/// An entry matches when its product is a substring of the row's product
/// name and, if it names a size, that size appears in the row's size label
/// or product name.
pub fn best_seller_rank(row: &ProductRow, entries: &[BestSellerEntry]) -> Option<usize> {
    let product = squash(&row.text(&Field::Product));
    if product.is_empty() {
        return None;
    }
    let packaging = format!("{}{}", squash(&row.text(&Field::Size)), product);

    entries.iter().position(|entry| {
        let wanted = squash(&entry.product);
        !wanted.is_empty()
            && product.contains(&wanted)
            && entry
                .size
                .as_deref()
                .map_or(true, |size| packaging.contains(&squash(size)))
    })
}
