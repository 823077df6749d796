//! Serializable table state and the shipment summary.

use crate::filter::FilterSpec;
use crate::order::OrderState;
use crate::quantity::QuantityMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything needed to resume a planning session over the same rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableState {
    pub filters: FilterSpec,
    pub order: OrderState,
    /// Units to make, by original index
    pub quantities: QuantityMap,
    /// Original indices whose quantity was typed or stepped by hand
    pub edited: BTreeSet<usize>,
    /// Row keys added to the shipment
    pub checked: BTreeSet<String>,
}

/// Totals for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentSummary {
    /// Rows loaded
    pub total_rows: usize,
    /// Rows passing the filters
    pub visible_rows: usize,
    /// Rows added to the shipment, visible or not
    pub added_rows: usize,
    /// Units to make across the added rows
    pub added_units: i64,
    /// Units to make across the visible rows
    pub visible_units: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::QuantityValue;

    #[test]
    fn test_state_yaml_roundtrip_keeps_integer_keys() {
        let mut state = TableState::default();
        state.quantities.insert(3, QuantityValue::Units(120));
        state.quantities.insert(7, QuantityValue::Raw("12".into()));
        state.edited.insert(7);
        state.checked.insert("SKU-1".into());

        let yaml = serde_yaml::to_string(&state).unwrap();
        let back: TableState = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, state);

        let json = serde_json::to_string(&state).unwrap();
        let back: TableState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_partial_state_fills_defaults() {
        let state: TableState = serde_json::from_str(r#"{"checked": ["A"]}"#).unwrap();
        assert_eq!(state.order, OrderState::NoOrder);
        assert!(state.quantities.is_empty());
        assert_eq!(state.checked.len(), 1);
    }
}
