//! Report output stage.

use crate::config::PlanConfig;
use crate::planner::{PlanListener, ShipmentPlanner};
use crate::reports::{create_reporter, PlanReport, ReportConfig, ReportMetadata};
use anyhow::Result;

use super::{auto_detect_format, should_use_color, write_output, OutputTarget};

/// Render the planner's visible rows to the configured destination.
///
/// Returns the report that was written so callers can inspect the summary.
pub fn output_report<L: PlanListener>(
    config: &PlanConfig,
    planner: &ShipmentPlanner<L>,
) -> Result<PlanReport> {
    let output = &config.planner.output;
    let output_target = OutputTarget::from_option(output.file.clone());
    let effective_output = auto_detect_format(output.format, &output_target);

    let report_config = ReportConfig {
        limit: config.limit,
        metadata: ReportMetadata {
            rows_path: Some(config.rows_path.to_string_lossy().to_string()),
            state_path: config
                .state_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        },
    };

    let plan = PlanReport::from_planner(planner);
    tracing::debug!(format = %effective_output, rows = plan.rows.len(), "rendering plan");

    let use_color = should_use_color(output.no_color) && output_target.is_terminal();
    let reporter = create_reporter(effective_output, use_color);
    let report = reporter.generate_plan_report(&plan, &report_config)?;

    write_output(&report, &output_target, config.planner.behavior.quiet)?;
    Ok(plan)
}
