//! Shipment selection.
//!
//! Two independent sets: the *checked* set of row keys (rows added to the
//! shipment) and the transient *multi-select* set of original indices that
//! bulk quantity operations act on. A row is never checked while its
//! resolved quantity is zero.

use std::collections::BTreeSet;

/// Result of toggling a row's checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The row has zero units to make; nothing changed
    Refused,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    checked: BTreeSet<String>,
    multi: BTreeSet<usize>,
    /// Original index of the last plain or ctrl click
    anchor: Option<usize>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an externally held checked set.
    #[must_use]
    pub fn with_checked(checked: BTreeSet<String>) -> Self {
        Self {
            checked,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Checked set
    // ------------------------------------------------------------------

    pub const fn checked(&self) -> &BTreeSet<String> {
        &self.checked
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.checked.contains(key)
    }

    /// Add a row unless its quantity is zero. Returns whether the set changed.
    pub fn check(&mut self, key: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            tracing::debug!(key, "refusing to add a row with zero units");
            return false;
        }
        self.checked.insert(key.to_string())
    }

    /// Returns whether the set changed.
    pub fn uncheck(&mut self, key: &str) -> bool {
        self.checked.remove(key)
    }

    pub fn toggle_checked(&mut self, key: &str, quantity: i64) -> ToggleOutcome {
        if self.uncheck(key) {
            ToggleOutcome::Removed
        } else if self.check(key, quantity) {
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Refused
        }
    }

    /// Check every `(key, quantity)` pair with a non-zero quantity.
    /// Returns the number of rows newly added.
    pub fn check_all<'k, I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = (&'k str, i64)>,
    {
        rows.into_iter()
            .filter(|(key, quantity)| self.check(key, *quantity))
            .count()
    }

    /// Returns the number of rows removed.
    pub fn uncheck_all<'k, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'k str>,
    {
        keys.into_iter().filter(|key| self.uncheck(key)).count()
    }

    /// Drop keys whose row can no longer be checked.
    pub fn enforce_nonzero<'k, I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = (&'k str, i64)>,
    {
        rows.into_iter()
            .filter(|(_, quantity)| *quantity <= 0)
            .filter(|(key, _)| self.uncheck(key))
            .count()
    }

    pub fn set_checked(&mut self, checked: BTreeSet<String>) {
        self.checked = checked;
    }

    // ------------------------------------------------------------------
    // Multi-select
    // ------------------------------------------------------------------

    pub const fn multi(&self) -> &BTreeSet<usize> {
        &self.multi
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.multi.contains(&index)
    }

    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Plain click: select only `index`, or deselect it if it was the only
    /// selected row.
    pub fn click(&mut self, index: usize) {
        let only_this = self.multi.len() == 1 && self.multi.contains(&index);
        self.multi.clear();
        if !only_this {
            self.multi.insert(index);
        }
        self.anchor = Some(index);
    }

    /// Shift-click: extend the selection with every visible row between the
    /// anchor and `index`, inclusive. Falls back to a plain click when there
    /// is no visible anchor.
    pub fn shift_click(&mut self, index: usize, visible: &[usize]) {
        let anchor_pos = self
            .anchor
            .and_then(|a| visible.iter().position(|&i| i == a));
        let target_pos = visible.iter().position(|&i| i == index);

        match (anchor_pos, target_pos) {
            (Some(a), Some(t)) => {
                let (lo, hi) = if a <= t { (a, t) } else { (t, a) };
                self.multi.extend(visible[lo..=hi].iter().copied());
            }
            _ => self.click(index),
        }
    }

    /// Ctrl/cmd-click: toggle one row without touching the others.
    pub fn ctrl_click(&mut self, index: usize) {
        if !self.multi.remove(&index) {
            self.multi.insert(index);
        }
        self.anchor = Some(index);
    }

    /// Select every visible row.
    pub fn select_all(&mut self, visible: &[usize]) {
        self.multi.extend(visible.iter().copied());
    }

    /// Deselect every visible row; hidden selections are kept.
    pub fn clear_all(&mut self, visible: &[usize]) {
        for index in visible {
            self.multi.remove(index);
        }
    }

    pub fn clear_multi(&mut self) {
        self.multi.clear();
        self.anchor = None;
    }
}
