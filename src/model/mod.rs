//! Row model shared by every pipeline stage.
//!
//! Rows arrive as loosely typed JSON objects. [`ProductRow`] keeps them that
//! way and exposes typed reads through [`Field`]; [`RowIndex`] precomputes
//! the lookups the planner needs after each load.

mod field;
mod index;
mod row;

pub use field::{format_number, parse_number, Column, Field, FieldValue};
pub use index::{RowIndex, RowSearchKey};
pub use row::ProductRow;
