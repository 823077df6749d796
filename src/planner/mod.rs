//! The shipment planner: owns every piece of table state and wires the
//! stages together.
//!
//! ```text
//! raw rows -> annotate -> filter -> order -> visible rows
//!                 |                              |
//!          QuantityStore  <---- edits ----  SelectionTracker
//! ```
//!
//! Edits go through the planner so that the zero-quantity invariant of the
//! checked set holds and the [`PlanListener`] hears about every change.

mod state;

pub use state::{ShipmentSummary, TableState};

use crate::config::{BestSellerEntry, PlannerConfig, PlanningConfig};
use crate::error::Result;
use crate::filter::{
    self, best_seller_rank, Condition, FilterContext, FilterSpec, PopularFilter,
};
use crate::model::{Column, ProductRow, RowIndex};
use crate::order::{self, OrderContext, OrderState, SortDirection, SortSpec};
use crate::pipeline::annotate;
use crate::quantity::{IncrementResolver, QuantityMap, QuantityStore, QuantityValue};
use crate::selection::{SelectionTracker, ToggleOutcome};
use std::collections::{BTreeSet, HashMap};

/// Receives change notifications from a [`ShipmentPlanner`].
pub trait PlanListener {
    /// The quantity mapping changed; `quantities` is the full new mapping.
    fn quantities_changed(&mut self, _quantities: &QuantityMap) {}

    /// The set of rows added to the shipment changed.
    fn added_rows_changed(&mut self, _added: &BTreeSet<String>) {}
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl PlanListener for NoopListener {}

pub struct ShipmentPlanner<L: PlanListener = NoopListener> {
    planning: PlanningConfig,
    best_sellers: Vec<BestSellerEntry>,
    resolver: IncrementResolver,
    rows: Vec<ProductRow>,
    index: RowIndex,
    quantities: QuantityStore,
    selection: SelectionTracker,
    filters: FilterSpec,
    order: OrderState,
    listener: L,
}

impl ShipmentPlanner<NoopListener> {
    /// A planner without a listener.
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        Self::with_listener(config, NoopListener)
    }
}

impl<L: PlanListener> ShipmentPlanner<L> {
    /// Fails only when the configured increment rules are invalid.
    pub fn with_listener(config: &PlannerConfig, listener: L) -> Result<Self> {
        Ok(Self {
            planning: config.planning.clone(),
            best_sellers: config.best_sellers.entries.clone(),
            resolver: IncrementResolver::with_overrides(&config.increments)?,
            rows: Vec::new(),
            index: RowIndex::default(),
            quantities: QuantityStore::new(),
            selection: SelectionTracker::new(),
            filters: FilterSpec::default(),
            order: OrderState::default(),
            listener,
        })
    }

    /// Use a caller-held quantity mapping (controlled mode).
    #[must_use]
    pub fn with_external_quantities(mut self, values: QuantityMap) -> Self {
        self.quantities = QuantityStore::from_external(values);
        self
    }

    /// Re-sync a caller-held quantity mapping. Rows the new mapping leaves
    /// at zero units drop out of the shipment.
    pub fn sync_quantities(&mut self, values: QuantityMap) {
        self.quantities.sync_external(values);
        self.listener.quantities_changed(self.quantities.values());
        if self.drop_zero_quantity_rows(None) > 0 {
            self.listener.added_rows_changed(self.selection.checked());
        }
    }

    // ========================================================================
    // Rows
    // ========================================================================

    /// Replace the row set: annotate, seed blank quantities and round
    /// unedited ones to their case packs.
    pub fn load_rows(&mut self, raw: &[ProductRow]) {
        self.rows = annotate(raw);
        self.index = RowIndex::build(&self.rows);

        let seeded = self.quantities.initialize_missing(&self.rows);
        let normalized = self
            .quantities
            .normalize_unedited(&self.rows, &self.resolver);
        tracing::info!(rows = self.rows.len(), seeded, normalized, "loaded rows");

        if seeded + normalized > 0 {
            self.listener.quantities_changed(self.quantities.values());
        }
        if self.drop_zero_quantity_rows(None) > 0 {
            self.listener.added_rows_changed(self.selection.checked());
        }
    }

    pub fn rows(&self) -> &[ProductRow] {
        &self.rows
    }

    /// Row by original index.
    pub fn row(&self, original: usize) -> Option<&ProductRow> {
        self.index
            .position_of_original(original)
            .and_then(|pos| self.rows.get(pos))
    }

    pub fn row_by_key(&self, key: &str) -> Option<&ProductRow> {
        self.index
            .position_of_key(key)
            .and_then(|pos| self.rows.get(pos))
    }

    fn filter_context(&self) -> FilterContext<'_> {
        FilterContext::new(self.selection.checked(), &self.planning, &self.best_sellers)
            .with_index(&self.index)
    }

    fn filtered(&self) -> Vec<&ProductRow> {
        filter::apply(&self.rows, &self.filters, &self.filter_context())
    }

    /// Filtered and ordered rows.
    pub fn visible_rows(&self) -> Vec<&ProductRow> {
        let filtered = self.filtered();

        let ranks: Option<HashMap<String, usize>> =
            (self.filters.popular == Some(PopularFilter::BestSellers)).then(|| {
                filtered
                    .iter()
                    .filter_map(|row| {
                        best_seller_rank(row, &self.best_sellers).map(|rank| (row.key(), rank))
                    })
                    .collect()
            });

        let ctx = OrderContext {
            checked: self.selection.checked(),
            best_seller_ranks: ranks.as_ref(),
        };
        order::apply(filtered, &self.order, &ctx)
    }

    /// Original indices of the visible rows, in display order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible_rows()
            .iter()
            .filter_map(|row| row.original_index)
            .collect()
    }

    // ========================================================================
    // Quantities
    // ========================================================================

    pub const fn quantities(&self) -> &QuantityStore {
        &self.quantities
    }

    /// Case-pack increment of a row; 1 for unknown indices.
    pub fn increment(&self, original: usize) -> i64 {
        self.row(original)
            .map_or(1, |row| self.resolver.resolve_row(row))
    }

    /// Resolved units to make for a row.
    pub fn quantity(&self, original: usize) -> i64 {
        self.quantities.resolved(original)
    }

    /// Typed input: stored as given and marked as edited.
    pub fn set_quantity(&mut self, original: usize, value: impl Into<QuantityValue>) {
        self.quantities.edit(original, value);
        self.quantities_updated(&[original]);
    }

    /// "+" control. Returns the new quantity.
    pub fn step_up(&mut self, original: usize) -> i64 {
        let increment = self.increment(original);
        let next = self.quantities.step_up(original, increment);
        self.quantities_updated(&[original]);
        next
    }

    /// "-" control. Returns the new quantity.
    pub fn step_down(&mut self, original: usize) -> i64 {
        let increment = self.increment(original);
        let next = self.quantities.step_down(original, increment);
        self.quantities_updated(&[original]);
        next
    }

    /// Back to the suggested quantity, rounded like a fresh load.
    pub fn reset_quantity(&mut self, original: usize) {
        let Some(row) = self.row(original).cloned() else {
            return;
        };
        self.quantities.reset(original, &row);
        self.quantities
            .normalize_unedited(std::slice::from_ref(&row), &self.resolver);
        self.quantities_updated(&[original]);
    }

    fn multi_selected(&self) -> Vec<usize> {
        self.selection.multi().iter().copied().collect()
    }

    /// "+" on every multi-selected row.
    pub fn bulk_step_up(&mut self) -> usize {
        let targets = self.multi_selected();
        for &original in &targets {
            let increment = self.increment(original);
            self.quantities.step_up(original, increment);
        }
        self.quantities_updated(&targets);
        targets.len()
    }

    /// "-" on every multi-selected row.
    pub fn bulk_step_down(&mut self) -> usize {
        let targets = self.multi_selected();
        for &original in &targets {
            let increment = self.increment(original);
            self.quantities.step_down(original, increment);
        }
        self.quantities_updated(&targets);
        targets.len()
    }

    /// Same typed value on every multi-selected row.
    pub fn bulk_set(&mut self, value: impl Into<QuantityValue>) -> usize {
        let targets = self.multi_selected();
        self.quantities
            .bulk_set(targets.iter().copied(), &value.into());
        self.quantities_updated(&targets);
        targets.len()
    }

    /// Notify, and drop rows that fell to zero units from the shipment.
    fn quantities_updated(&mut self, touched: &[usize]) {
        if touched.is_empty() {
            return;
        }
        self.listener.quantities_changed(self.quantities.values());
        if self.drop_zero_quantity_rows(Some(touched)) > 0 {
            self.listener.added_rows_changed(self.selection.checked());
        }
    }

    /// Uncheck rows whose units resolve to zero, over `only` or every
    /// loaded row. Checked keys with no loaded row are left alone.
    fn drop_zero_quantity_rows(&mut self, only: Option<&[usize]>) -> usize {
        let candidates: Vec<(String, i64)> = match only {
            Some(indices) => indices
                .iter()
                .filter_map(|&original| {
                    self.row(original)
                        .map(|row| (row.key(), self.quantities.resolved(original)))
                })
                .collect(),
            None => self
                .rows
                .iter()
                .filter_map(|row| {
                    row.original_index
                        .map(|original| (row.key(), self.quantities.resolved(original)))
                })
                .collect(),
        };
        let removed = self
            .selection
            .enforce_nonzero(candidates.iter().map(|(k, q)| (k.as_str(), *q)));
        if removed > 0 {
            tracing::debug!(removed, "removed rows with zero units from the shipment");
        }
        removed
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub const fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Units to make for the row with this key; 0 if unknown.
    fn quantity_for_key(&self, key: &str) -> i64 {
        self.row_by_key(key)
            .and_then(|row| row.original_index)
            .map_or(0, |original| self.quantities.resolved(original))
    }

    /// Checkbox click.
    pub fn toggle_added(&mut self, key: &str) -> ToggleOutcome {
        let quantity = self.quantity_for_key(key);
        let outcome = self.selection.toggle_checked(key, quantity);
        if outcome != ToggleOutcome::Refused {
            self.listener.added_rows_changed(self.selection.checked());
        }
        outcome
    }

    /// Add every visible row that has units to make.
    pub fn check_visible(&mut self) -> usize {
        let candidates: Vec<(String, i64)> = self
            .visible_rows()
            .iter()
            .map(|row| {
                let units = row
                    .original_index
                    .map_or(0, |original| self.quantities.resolved(original));
                (row.key(), units)
            })
            .collect();
        let added = self
            .selection
            .check_all(candidates.iter().map(|(k, q)| (k.as_str(), *q)));
        if added > 0 {
            self.listener.added_rows_changed(self.selection.checked());
        }
        added
    }

    /// Remove every visible row from the shipment.
    pub fn uncheck_visible(&mut self) -> usize {
        let keys: Vec<String> = self.visible_rows().iter().map(|row| row.key()).collect();
        let removed = self.selection.uncheck_all(keys.iter().map(String::as_str));
        if removed > 0 {
            self.listener.added_rows_changed(self.selection.checked());
        }
        removed
    }

    pub fn click(&mut self, original: usize) {
        self.selection.click(original);
    }

    pub fn shift_click(&mut self, original: usize) {
        let visible = self.visible_indices();
        self.selection.shift_click(original, &visible);
    }

    pub fn ctrl_click(&mut self, original: usize) {
        self.selection.ctrl_click(original);
    }

    pub fn select_all_visible(&mut self) {
        let visible = self.visible_indices();
        self.selection.select_all(&visible);
    }

    pub fn clear_visible_selection(&mut self) {
        let visible = self.visible_indices();
        self.selection.clear_all(&visible);
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    pub const fn order(&self) -> &OrderState {
        &self.order
    }

    /// Live sort; replaces any captured order.
    pub fn sort_by(&mut self, column: impl Into<Column>, direction: SortDirection) {
        self.order.sort_by(SortSpec::new(column, direction));
    }

    /// Sort once and freeze the result, so later edits do not move rows.
    pub fn sort_once(&mut self, column: impl Into<Column>, direction: SortDirection) {
        let spec = SortSpec::new(column, direction);
        let mut all: Vec<&ProductRow> = self.rows.iter().collect();
        order::live_sort(&mut all, &spec, self.selection.checked());
        let keys = order::keys_of(&all);
        tracing::debug!(column = %spec.column, rows = keys.len(), "captured sort order");
        self.order.capture(keys);
    }

    pub fn clear_sort(&mut self) {
        self.order.reset();
    }

    // ========================================================================
    // Filters
    // ========================================================================

    pub const fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn set_filters(&mut self, spec: FilterSpec) {
        self.filters = spec;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filters.search = search.filter(|s| !s.trim().is_empty());
    }

    /// Checkbox value set on a column. `None` removes it.
    pub fn set_values(&mut self, column: Column, values: Option<BTreeSet<String>>) {
        self.filters.column_mut(column).values = values;
        self.filters.prune();
    }

    pub fn set_condition(&mut self, column: Column, condition: Option<Condition>) {
        self.filters.column_mut(column).condition = condition;
        self.filters.prune();
    }

    pub fn set_text_filter(&mut self, column: Column, text: Option<String>) {
        self.filters.column_mut(column).text = text;
        self.filters.prune();
    }

    pub fn set_popular(&mut self, popular: Option<PopularFilter>) {
        self.filters.popular = popular;
    }

    pub fn clear_column_filter(&mut self, column: &Column) {
        self.filters.clear_column(column);
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn snapshot(&self) -> TableState {
        TableState {
            filters: self.filters.clone(),
            order: self.order.clone(),
            quantities: self.quantities.values().clone(),
            edited: self.quantities.edited().clone(),
            checked: self.selection.checked().clone(),
        }
    }

    /// Resume from a saved state. Rows the state has no quantity for are
    /// seeded as on a fresh load, and saved checks on rows that now have
    /// zero units are dropped.
    pub fn restore(&mut self, state: TableState) {
        self.filters = state.filters;
        self.order = state.order;
        self.quantities.restore(state.quantities, state.edited);
        self.selection.set_checked(state.checked);

        self.quantities.initialize_missing(&self.rows);
        self.quantities
            .normalize_unedited(&self.rows, &self.resolver);
        self.drop_zero_quantity_rows(None);

        self.listener.quantities_changed(self.quantities.values());
        self.listener.added_rows_changed(self.selection.checked());
    }

    pub fn summary(&self) -> ShipmentSummary {
        let visible: Vec<usize> = self
            .filtered()
            .iter()
            .filter_map(|row| row.original_index)
            .collect();
        let added: Vec<usize> = self
            .selection
            .checked()
            .iter()
            .filter_map(|key| self.row_by_key(key).and_then(|row| row.original_index))
            .collect();

        ShipmentSummary {
            total_rows: self.rows.len(),
            visible_rows: visible.len(),
            added_rows: self.selection.checked().len(),
            added_units: self.quantities.total_units(added),
            visible_units: self.quantities.total_units(visible),
        }
    }

    // ========================================================================
    // Listener
    // ========================================================================

    pub const fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }
}
