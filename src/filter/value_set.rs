//! Checkbox-style value-set filters.

use crate::model::{Column, ProductRow};
use std::collections::BTreeSet;

/// Display value of a row in a column, as used for value-set membership.
pub fn column_value(row: &ProductRow, column: &Column, checked: &BTreeSet<String>) -> String {
    match column {
        Column::Added => {
            if checked.contains(&row.key()) {
                Column::ADDED_LABEL.to_string()
            } else {
                Column::NOT_ADDED_LABEL.to_string()
            }
        }
        Column::Field(field) => row.get(field).display().trim().to_string(),
    }
}

/// Every distinct display value of a column across `rows`.
pub fn column_domain<'r, I>(rows: I, column: &Column, checked: &BTreeSet<String>) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'r ProductRow>,
{
    rows.into_iter()
        .map(|row| column_value(row, column, checked))
        .collect()
}

/// How a selected value set behaves against a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSetMode {
    /// Selection covers the whole domain; the filter is off
    Inactive,
    /// Nothing selected; no row passes
    MatchNone,
    /// Keep rows whose value is selected
    Members,
}

/// Classify a selection against the domain of the rows it will filter.
pub fn value_set_mode(selected: &BTreeSet<String>, domain: &BTreeSet<String>) -> ValueSetMode {
    if selected.is_empty() {
        ValueSetMode::MatchNone
    } else if domain.is_subset(selected) {
        ValueSetMode::Inactive
    } else {
        ValueSetMode::Members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_added_pseudo_column() {
        let checked = set(&["A"]);
        let a = ProductRow::new().with("id", "A");
        let b = ProductRow::new().with("id", "B");
        assert_eq!(column_value(&a, &Column::Added, &checked), "Added");
        assert_eq!(column_value(&b, &Column::Added, &checked), "Not Added");
    }

    #[test]
    fn test_numeric_values_use_display_form() {
        let row = ProductRow::new().with("inventory", 12.0);
        let column = Column::Field(Field::Inventory);
        assert_eq!(column_value(&row, &column, &BTreeSet::new()), "12");
    }

    #[test]
    fn test_modes() {
        let domain = set(&["Acme", "Shoppe"]);
        assert_eq!(value_set_mode(&set(&[]), &domain), ValueSetMode::MatchNone);
        assert_eq!(value_set_mode(&set(&["Acme"]), &domain), ValueSetMode::Members);
        assert_eq!(
            value_set_mode(&set(&["Acme", "Shoppe"]), &domain),
            ValueSetMode::Inactive
        );
        assert_eq!(
            value_set_mode(&set(&["Acme", "Shoppe", "Gone"]), &domain),
            ValueSetMode::Inactive
        );
    }
}
