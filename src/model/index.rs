//! Lookup structures over an annotated row set.
//!
//! Built once per row load so that selection checks and quantity edits can
//! find a row by key or original index without scanning, and so that the
//! free-text search does not allocate lowercased strings on every pass.

use super::{Field, ProductRow};
use std::collections::HashMap;

/// Precomputed index over annotated rows.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RowIndex {
    /// Position in the annotated array by row key
    by_key: HashMap<String, usize>,
    /// Position in the annotated array by original index
    by_original: HashMap<usize, usize>,
    /// Search keys, parallel to the annotated array
    search_keys: Vec<RowSearchKey>,
}

/// Pre-computed lowercase strings for free-text search.
#[derive(Debug, Clone, Default)]
pub struct RowSearchKey {
    pub id_lower: String,
    pub brand_lower: String,
    pub product_lower: String,
    pub size_lower: String,
}

impl RowSearchKey {
    pub fn from_row(row: &ProductRow) -> Self {
        Self {
            id_lower: row.text(&Field::Id).to_lowercase(),
            brand_lower: row.text(&Field::Brand).to_lowercase(),
            product_lower: row.text(&Field::Product).to_lowercase(),
            size_lower: row.text(&Field::Size).to_lowercase(),
        }
    }

    /// Check if any searchable column contains the query (already lowercased).
    pub fn contains(&self, query_lower: &str) -> bool {
        self.id_lower.contains(query_lower)
            || self.brand_lower.contains(query_lower)
            || self.product_lower.contains(query_lower)
            || self.size_lower.contains(query_lower)
    }
}

impl RowIndex {
    /// Build an index from annotated rows. Later duplicates of a key lose.
    pub fn build(rows: &[ProductRow]) -> Self {
        let mut by_key = HashMap::with_capacity(rows.len());
        let mut by_original = HashMap::with_capacity(rows.len());
        let mut search_keys = Vec::with_capacity(rows.len());

        for (pos, row) in rows.iter().enumerate() {
            by_key.entry(row.key()).or_insert(pos);
            if let Some(idx) = row.original_index {
                by_original.entry(idx).or_insert(pos);
            }
            search_keys.push(RowSearchKey::from_row(row));
        }

        Self {
            by_key,
            by_original,
            search_keys,
        }
    }

    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn position_of_original(&self, original_index: usize) -> Option<usize> {
        self.by_original.get(&original_index).copied()
    }

    pub fn search_key(&self, position: usize) -> Option<&RowSearchKey> {
        self.search_keys.get(position)
    }

    pub fn len(&self) -> usize {
        self.search_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.search_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ProductRow> {
        let mut a = ProductRow::new().with("id", "A").with("brand", "The Plant Shoppe");
        a.original_index = Some(3);
        let mut b = ProductRow::new().with("brand", "Acme").with("product", "Citrus Food");
        b.original_index = Some(7);
        vec![a, b]
    }

    #[test]
    fn test_lookup_by_key_and_original() {
        let index = RowIndex::build(&rows());
        assert_eq!(index.position_of_key("A"), Some(0));
        assert_eq!(index.position_of_key("#7"), Some(1));
        assert_eq!(index.position_of_original(3), Some(0));
        assert_eq!(index.position_of_original(0), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_search_key_contains() {
        let index = RowIndex::build(&rows());
        assert!(index.search_key(0).unwrap().contains("shoppe"));
        assert!(index.search_key(1).unwrap().contains("citrus"));
        assert!(!index.search_key(1).unwrap().contains("shoppe"));
    }
}
