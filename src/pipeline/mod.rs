//! Pipeline stages for planning runs.
//!
//! load → annotate → plan → report, shared by the CLI command handlers.

mod annotate;
mod load;
mod output;
mod report_stage;

pub use annotate::annotate;
pub use load::{load_rows, load_state, parse_rows, save_state};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use report_stage::output_report;

/// Exit codes for scripting
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// No rows survived the filters and `fail_on_empty` is set
    pub const EMPTY_PLAN: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 2;
}
