//! Plan command handler.
//!
//! Loads rows (and optionally a saved table state), applies this run's
//! filters, edits and ordering, renders the visible plan, and optionally
//! saves the resulting state for the next run.

use super::expr::{parse_only, parse_qty, parse_sort, parse_where};
use crate::config::{PlanConfig, Validatable};
use crate::error::{OptionContext, PlannerError};
use crate::filter::PopularFilter;
use crate::pipeline::{exit_codes, load_rows, load_state, output_report, save_state};
use crate::planner::{PlanListener, ShipmentPlanner};
use crate::selection::ToggleOutcome;
use anyhow::{bail, Context, Result};

/// Edits requested on the command line, applied on top of any saved state.
#[derive(Debug, Clone, Default)]
pub struct PlanEdits {
    /// Free-text search across every row field
    pub search: Option<String>,
    /// `COL:OP[:V[:V2]]` condition filters
    pub conditions: Vec<String>,
    /// `COL=a,b` value-set filters
    pub only: Vec<String>,
    /// Quick filter
    pub popular: Option<PopularFilter>,
    /// `COL[:asc|desc]`
    pub sort: Option<String>,
    /// Capture the sorted order instead of keeping a live sort
    pub freeze: bool,
    /// Row keys to add to the shipment
    pub add: Vec<String>,
    /// `KEY=N` quantity edits
    pub quantities: Vec<String>,
}

/// Run the plan command and return the process exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_plan(config: PlanConfig, edits: PlanEdits) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", joined.join("\n  "));
    }

    let rows = load_rows(&config.rows_path)?;
    let mut planner = ShipmentPlanner::new(&config.planner)?;
    planner.load_rows(&rows);

    if let Some(ref path) = config.state_path {
        let state = load_state(path)?;
        planner.restore(state);
        tracing::debug!("Resumed table state from {}", path.display());
    }

    apply_edits(&mut planner, &edits)?;

    let plan = output_report(&config, &planner)?;

    if let Some(ref path) = config.save_state {
        save_state(path, &planner.snapshot())
            .with_context(|| format!("saving table state to {}", path.display()))?;
    }

    if config.planner.behavior.fail_on_empty && plan.rows.is_empty() {
        tracing::warn!("No rows left after filtering");
        return Ok(exit_codes::EMPTY_PLAN);
    }
    Ok(exit_codes::SUCCESS)
}

/// Apply filters, then quantity edits, then additions, then ordering.
pub fn apply_edits<L: PlanListener>(
    planner: &mut ShipmentPlanner<L>,
    edits: &PlanEdits,
) -> crate::error::Result<()> {
    if edits.search.is_some() {
        planner.set_search(edits.search.clone());
    }
    for expr in &edits.conditions {
        let (column, condition) = parse_where(expr)?;
        planner.set_condition(column, Some(condition));
    }
    for expr in &edits.only {
        let (column, values) = parse_only(expr)?;
        planner.set_values(column, Some(values));
    }
    if edits.popular.is_some() {
        planner.set_popular(edits.popular);
    }

    for expr in &edits.quantities {
        let (key, units) = parse_qty(expr)?;
        let original = planner
            .row_by_key(&key)
            .and_then(|row| row.original_index)
            .context_none(format!("no row with key '{key}'"))?;
        planner.set_quantity(original, units);
    }

    for key in &edits.add {
        planner
            .row_by_key(key)
            .context_none(format!("no row with key '{key}'"))?;
        if planner.selection().is_checked(key) {
            continue;
        }
        if planner.toggle_added(key) == ToggleOutcome::Refused {
            tracing::warn!("Row '{key}' has no units to make; not added");
        }
    }

    match (&edits.sort, edits.freeze) {
        (Some(expr), freeze) => {
            let spec = parse_sort(expr)?;
            if freeze {
                planner.sort_once(spec.column, spec.direction);
            } else {
                planner.sort_by(spec.column, spec.direction);
            }
        }
        (None, true) => {
            return Err(PlannerError::validation("--freeze needs --sort"));
        }
        (None, false) => {}
    }

    Ok(())
}
