//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per subcommand.

mod expr;
mod increment;
mod plan;

pub use expr::{parse_only, parse_qty, parse_sort, parse_where};
pub use increment::{render_increments, run_increment};
pub use plan::{apply_edits, run_plan, PlanEdits};

// Re-export config types used by handlers
pub use crate::config::{PlanConfig, PlannerConfig};
