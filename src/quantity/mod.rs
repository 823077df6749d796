//! Quantity planning: case-pack increments and the per-row quantity store.

mod increment;
mod store;

pub use increment::{
    normalize_packaging_text, resolve_increment, round_down, round_nearest, round_up, step_down,
    step_up, IncrementResolver, IncrementRule,
};
pub use store::{
    row_set_signature, QuantityMap, QuantityStore, QuantityValue, StorageMode,
    MAX_UNITS,
};
