//! **Shipment quantity planning over loosely typed inventory rows.**
//!
//! `shipment-planner` holds the state behind a fulfillment dashboard's
//! "what do we make next" table: per-row units to make rounded to case
//! packs, rows added to the shipment, column filters, quick filters, and
//! sort order. It powers both a command-line tool and a library for
//! embedding the same rules in other front ends.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`ProductRow`], a tolerant view over a JSON object, and
//!   the [`Field`] resolver that reads a logical field from any of its
//!   synonymous keys.
//! - **[`quantity`]**: the [`IncrementResolver`] (size text → case pack) and
//!   the [`QuantityStore`] of units to make.
//! - **[`filter`]**: value sets, operator conditions, text filters, global
//!   search and the popular quick filters, combined by AND.
//! - **[`order`]**: live sorts and captured one-shot orders.
//! - **[`selection`]**: the added-to-shipment set and multi-row selection.
//! - **[`planner`]**: the [`ShipmentPlanner`] that owns all of the above and
//!   notifies a [`PlanListener`] of changes.
//! - **[`pipeline`]** and **[`reports`]**: loading rows and saved state,
//!   rendering plans as a table, JSON or CSV.
//!
//! ## Getting Started
//!
//! ```no_run
//! use shipment_planner::{load_rows, PlannerConfig, ShipmentPlanner};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows = load_rows(Path::new("rows.json"))?;
//!     let mut planner = ShipmentPlanner::new(&PlannerConfig::default())?;
//!     planner.load_rows(&rows);
//!
//!     for row in planner.visible_rows() {
//!         let idx = row.original_index.unwrap_or_default();
//!         println!("{}: {} units", row.key(), planner.quantity(idx));
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::module_name_repetitions
)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod order;
pub mod pipeline;
pub mod planner;
pub mod quantity;
pub mod reports;
pub mod selection;

pub use api::ApiResponse;
pub use config::{
    BestSellerEntry, ConfigError, PlanConfig, PlannerConfig, PlannerConfigBuilder, Validatable,
};
pub use error::{ErrorContext, LoadErrorKind, OptionContext, PlannerError, Result};
pub use filter::{Condition, ConditionOperator, FilterSpec, PopularFilter};
pub use model::{Column, Field, FieldValue, ProductRow};
pub use order::{OrderState, SortDirection, SortSpec};
pub use pipeline::{load_rows, load_state, parse_rows, save_state};
pub use planner::{NoopListener, PlanListener, ShipmentPlanner, ShipmentSummary, TableState};
pub use quantity::{IncrementResolver, QuantityStore, QuantityValue};
pub use reports::{PlanReport, ReportFormat, ReportGenerator};
pub use selection::{SelectionTracker, ToggleOutcome};
