//! Pending "units to make" per row.
//!
//! Entries are keyed by a row's original index so that edits stay attached to
//! the right product no matter how filtering and sorting reorder the visible
//! list. A companion set records which entries the user touched directly;
//! those are never rewritten by automatic normalization.

use super::increment::{round_up, step_down, step_up, IncrementResolver};
use crate::model::{parse_number, ProductRow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use xxhash_rust::xxh3::xxh3_64;

/// Largest quantity an entry resolves to; larger input is clamped.
pub const MAX_UNITS: i64 = 1_000_000_000;

/// Sparse mapping from original row index to quantity entry.
pub type QuantityMap = BTreeMap<usize, QuantityValue>;

/// A quantity entry as typed by the user or seeded by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Units(i64),
    /// Raw text input, stored verbatim
    Raw(String),
    #[default]
    Empty,
}

impl QuantityValue {
    /// Whole units this entry stands for. Non-numeric and negative input
    /// resolve to 0; anything above [`MAX_UNITS`] resolves to it.
    pub fn resolve(&self) -> i64 {
        match self {
            Self::Units(n) => (*n).clamp(0, MAX_UNITS),
            Self::Raw(s) => match parse_number(s) {
                Some(n) if n > 0.0 => (n.round() as i64).min(MAX_UNITS),
                _ => 0,
            },
            Self::Empty => 0,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Units(_) => false,
            Self::Raw(s) => s.trim().is_empty(),
            Self::Empty => true,
        }
    }
}

impl From<i64> for QuantityValue {
    fn from(n: i64) -> Self {
        Self::Units(n)
    }
}

impl From<&str> for QuantityValue {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for QuantityValue {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

/// Who owns the quantity mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// The store generated and owns its entries
    #[default]
    Uncontrolled,
    /// Entries are supplied by the caller and re-synced from it
    Controlled,
}

/// Quantity entries plus the manually-edited set.
#[derive(Debug, Clone, Default)]
pub struct QuantityStore {
    values: QuantityMap,
    edited: BTreeSet<usize>,
    seeded_signature: Option<u64>,
    mode: StorageMode,
}

impl QuantityStore {
    /// An uncontrolled, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store backed by caller-supplied entries.
    pub fn from_external(values: QuantityMap) -> Self {
        Self {
            values,
            mode: StorageMode::Controlled,
            ..Self::default()
        }
    }

    /// Replace all entries with the caller's current mapping.
    pub fn sync_external(&mut self, values: QuantityMap) {
        self.values = values;
        self.mode = StorageMode::Controlled;
    }

    pub const fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Current entry, or [`QuantityValue::Empty`].
    pub fn get(&self, index: usize) -> QuantityValue {
        self.values.get(&index).cloned().unwrap_or_default()
    }

    /// Store a raw value without rounding or validation.
    pub fn set(&mut self, index: usize, value: impl Into<QuantityValue>) {
        self.values.insert(index, value.into());
    }

    /// Store a value typed by the user and mark the entry as edited.
    pub fn edit(&mut self, index: usize, value: impl Into<QuantityValue>) {
        self.set(index, value);
        self.edited.insert(index);
    }

    /// Whole units for an entry.
    pub fn resolved(&self, index: usize) -> i64 {
        self.values.get(&index).map_or(0, QuantityValue::resolve)
    }

    pub fn is_edited(&self, index: usize) -> bool {
        self.edited.contains(&index)
    }

    /// Move to the next multiple of `increment` and mark as edited.
    pub fn step_up(&mut self, index: usize, increment: i64) -> i64 {
        let next = step_up(self.resolved(index), increment);
        self.edit(index, next);
        next
    }

    /// Move to the previous multiple of `increment` and mark as edited.
    pub fn step_down(&mut self, index: usize, increment: i64) -> i64 {
        let next = step_down(self.resolved(index), increment);
        self.edit(index, next);
        next
    }

    /// Set the same value on many entries, marking each as edited.
    pub fn bulk_set<I>(&mut self, indices: I, value: &QuantityValue)
    where
        I: IntoIterator<Item = usize>,
    {
        for index in indices {
            self.edit(index, value.clone());
        }
    }

    /// Restore the suggested value and forget the manual edit.
    pub fn reset(&mut self, index: usize, row: &ProductRow) {
        self.values.insert(index, QuantityValue::Units(row.suggested_units()));
        self.edited.remove(&index);
    }

    /// Seed blank entries from each row's suggested quantity.
    ///
    /// Runs once per distinct row set; calling it again with the same rows
    /// (in any order) is a no-op. Returns the number of entries seeded.
    pub fn initialize_missing(&mut self, rows: &[ProductRow]) -> usize {
        let signature = row_set_signature(rows);
        if self.seeded_signature == Some(signature) {
            return 0;
        }
        self.seeded_signature = Some(signature);

        let mut seeded = 0;
        for row in rows {
            let Some(index) = row.original_index else {
                continue;
            };
            if self.get(index).is_blank() {
                self.values
                    .insert(index, QuantityValue::Units(row.suggested_units()));
                seeded += 1;
            }
        }
        tracing::debug!(seeded, rows = rows.len(), "seeded missing quantities");
        seeded
    }

    /// Round every unedited entry up to its row's case pack.
    ///
    /// Returns the number of entries that changed.
    pub fn normalize_unedited(&mut self, rows: &[ProductRow], resolver: &IncrementResolver) -> usize {
        let mut changed = 0;
        for row in rows {
            let Some(index) = row.original_index else {
                continue;
            };
            if self.edited.contains(&index) {
                continue;
            }
            let current = self.resolved(index);
            let rounded = round_up(current, resolver.resolve_row(row));
            if rounded != current {
                self.values.insert(index, QuantityValue::Units(rounded));
                changed += 1;
            }
        }
        if changed > 0 {
            tracing::debug!(changed, "normalized unedited quantities to case packs");
        }
        changed
    }

    /// Sum of resolved units over the given entries.
    pub fn total_units<I>(&self, indices: I) -> i64
    where
        I: IntoIterator<Item = usize>,
    {
        indices
            .into_iter()
            .fold(0_i64, |total, i| total.saturating_add(self.resolved(i)))
    }

    pub const fn values(&self) -> &QuantityMap {
        &self.values
    }

    pub const fn edited(&self) -> &BTreeSet<usize> {
        &self.edited
    }

    /// Replace entries and edited flags, e.g. from a saved table state.
    ///
    /// The seed signature is cleared so the next load re-seeds any rows the
    /// saved state does not cover.
    pub fn restore(&mut self, values: QuantityMap, edited: BTreeSet<usize>) {
        self.values = values;
        self.edited = edited;
        self.seeded_signature = None;
    }
}

/// Order-independent signature of a row set: the sorted, deduplicated row keys.
pub fn row_set_signature(rows: &[ProductRow]) -> u64 {
    let keys: BTreeSet<String> = rows.iter().map(ProductRow::key).collect();
    let joined = keys.into_iter().collect::<Vec<_>>().join("\u{1f}");
    xxh3_64(joined.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, index: usize, size: &str, suggested: i64) -> ProductRow {
        let mut row = ProductRow::new()
            .with("id", id)
            .with("size", size)
            .with("suggestedQty", suggested);
        row.original_index = Some(index);
        row
    }

    #[test]
    fn test_zero_suggestion_seeds_zero_not_blank() {
        let mut store = QuantityStore::new();
        store.initialize_missing(&[row("A", 0, "8oz", 0)]);
        assert_eq!(store.get(0), QuantityValue::Units(0));
        assert!(!store.get(0).is_blank());
    }

    #[test]
    fn test_seed_then_normalize_rounds_up() {
        let rows = [row("B", 0, "8oz", 75)];
        let mut store = QuantityStore::new();
        store.initialize_missing(&rows);
        assert_eq!(store.resolved(0), 75);

        let changed = store.normalize_unedited(&rows, &IncrementResolver::builtin());
        assert_eq!(changed, 1);
        assert_eq!(store.get(0), QuantityValue::Units(120));
    }

    #[test]
    fn test_normalize_skips_edited_rows() {
        let rows = [row("B", 0, "8oz", 75)];
        let mut store = QuantityStore::new();
        store.initialize_missing(&rows);
        store.edit(0, 70_i64);
        assert_eq!(store.normalize_unedited(&rows, &IncrementResolver::builtin()), 0);
        assert_eq!(store.resolved(0), 70);
    }

    #[test]
    fn test_existing_entries_are_not_reseeded() {
        let rows = [row("A", 0, "8oz", 60)];
        let mut store = QuantityStore::new();
        store.set(0, "180");
        store.initialize_missing(&rows);
        assert_eq!(store.get(0), QuantityValue::Raw("180".into()));
    }

    #[test]
    fn test_seeding_runs_once_per_row_set() {
        let rows = vec![row("A", 0, "8oz", 60), row("B", 1, "1 lb", 25)];
        let mut store = QuantityStore::new();
        assert_eq!(store.initialize_missing(&rows), 2);

        store.set(0, "");
        let reversed: Vec<_> = rows.iter().rev().cloned().collect();
        assert_eq!(store.initialize_missing(&reversed), 0);
        assert!(store.get(0).is_blank());

        let mut grown = rows.clone();
        grown.push(row("C", 2, "5 lb", 5));
        assert_eq!(store.initialize_missing(&grown), 2);
        assert_eq!(store.resolved(0), 60);
    }

    #[test]
    fn test_invalid_input_resolves_to_zero() {
        let mut store = QuantityStore::new();
        store.set(0, "lots");
        store.set(1, -40_i64);
        store.set(2, "-3");
        store.set(3, " 1,200 ");
        assert_eq!(store.resolved(0), 0);
        assert_eq!(store.resolved(1), 0);
        assert_eq!(store.resolved(2), 0);
        assert_eq!(store.resolved(3), 1200);
        assert_eq!(store.resolved(99), 0);
    }

    #[test]
    fn test_huge_input_is_clamped() {
        let mut store = QuantityStore::new();
        store.set(0, "1e30");
        store.set(1, i64::MAX);
        assert_eq!(store.resolved(0), MAX_UNITS);
        assert_eq!(store.resolved(1), MAX_UNITS);
        assert_eq!(store.total_units([0, 1]), 2 * MAX_UNITS);
        assert!(store.step_up(1, 60) > MAX_UNITS - 60);
    }

    #[test]
    fn test_steps_mark_edited() {
        let mut store = QuantityStore::new();
        store.set(0, 61_i64);
        assert_eq!(store.step_up(0, 60), 120);
        assert!(store.is_edited(0));
        assert_eq!(store.step_down(0, 60), 60);
        assert_eq!(store.step_down(0, 60), 0);
        assert_eq!(store.step_down(0, 60), 0);
    }

    #[test]
    fn test_reset_restores_suggestion() {
        let r = row("A", 0, "8oz", 120);
        let mut store = QuantityStore::new();
        store.edit(0, 999_i64);
        store.reset(0, &r);
        assert_eq!(store.resolved(0), 120);
        assert!(!store.is_edited(0));
    }

    #[test]
    fn test_controlled_mode() {
        let mut external = QuantityMap::new();
        external.insert(4, QuantityValue::Units(12));
        let mut store = QuantityStore::from_external(external);
        assert_eq!(store.mode(), StorageMode::Controlled);
        assert_eq!(store.resolved(4), 12);

        let mut updated = QuantityMap::new();
        updated.insert(4, QuantityValue::Raw("24".into()));
        store.sync_external(updated);
        assert_eq!(store.resolved(4), 24);
    }

    #[test]
    fn test_bulk_set_and_total() {
        let mut store = QuantityStore::new();
        store.bulk_set([1, 2, 3], &QuantityValue::Units(10));
        assert_eq!(store.total_units([1, 2, 3, 4]), 30);
        assert!(store.is_edited(2));
    }

    #[test]
    fn test_quantity_value_serde_forms() {
        let map: QuantityMap = serde_json::from_str(r#"{"0": 5, "1": "12", "2": null}"#).unwrap();
        assert_eq!(map[&0], QuantityValue::Units(5));
        assert_eq!(map[&1], QuantityValue::Raw("12".into()));
        assert_eq!(map[&2], QuantityValue::Empty);
    }
}
