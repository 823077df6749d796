//! Original-index annotation.

use crate::model::ProductRow;

/// Copy `rows`, giving each one an `_originalIndex`.
///
/// Rows that already carry an index keep it, so annotating a filtered
/// subset of an annotated array does not renumber anything. Other rows get
/// their position in `rows`.
pub fn annotate(rows: &[ProductRow]) -> Vec<ProductRow> {
    rows.iter()
        .enumerate()
        .map(|(pos, row)| {
            let mut copy = row.clone();
            copy.original_index.get_or_insert(pos);
            copy
        })
        .collect()
}
