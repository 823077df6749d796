//! Default values for shipment-planner configuration.

use super::types::BestSellerEntry;

/// Days of inventory above which a row counts as overstocked.
pub const DEFAULT_OVERSTOCK_DAYS: f64 = 180.0;

/// Days of inventory below which a row counts as low on stock.
pub const DEFAULT_LOW_STOCK_DAYS: f64 = 30.0;

/// Built-in best-seller ranking, highest first.
const DEFAULT_BEST_SELLERS: &[(&str, Option<&str>)] = &[
    ("indoor plant food", Some("8oz")),
    ("fiddle leaf fig", Some("8oz")),
    ("monstera", Some("8oz")),
    ("citrus", Some("8oz")),
    ("succulent", Some("8oz")),
    ("orchid", Some("8oz")),
    ("worm castings", Some("1 lb")),
    ("cactus soil", Some("quart")),
    ("indoor plant food", Some("gallon")),
];

/// The built-in best-seller list as config entries.
#[must_use]
pub fn default_best_sellers() -> Vec<BestSellerEntry> {
    DEFAULT_BEST_SELLERS
        .iter()
        .map(|(product, size)| BestSellerEntry::new(*product, *size))
        .collect()
}
