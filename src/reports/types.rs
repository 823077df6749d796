//! Report type definitions.

use crate::filter::PopularFilter;
use crate::order::OrderState;
use crate::planner::{PlanListener, ShipmentPlanner, ShipmentSummary};
use crate::model::Field;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: table on a terminal, JSON otherwise
    #[default]
    Auto,
    /// Aligned table for the terminal
    Table,
    /// Structured JSON output
    Json,
    /// CSV for spreadsheet import
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Where the plan came from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_path: Option<String>,
}

/// Options shared by every reporter.
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Maximum rows to render (summaries always cover every row)
    pub limit: Option<usize>,
    pub metadata: ReportMetadata,
}

/// One visible row of the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRow {
    pub key: String,
    pub original_index: usize,
    pub brand: String,
    pub product: String,
    pub size: String,
    pub days_of_inventory: f64,
    pub inventory: f64,
    pub sales_30_day: f64,
    /// Case pack
    pub increment: i64,
    /// Units to make
    pub units: i64,
    pub edited: bool,
    pub added: bool,
}

/// The visible plan, detached from the planner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub rows: Vec<PlannedRow>,
    pub summary: ShipmentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular: Option<PopularFilter>,
    pub order: String,
}

impl PlanReport {
    pub fn from_planner<L: PlanListener>(planner: &ShipmentPlanner<L>) -> Self {
        let rows = planner
            .visible_rows()
            .into_iter()
            .filter_map(|row| {
                let original = row.original_index?;
                let key = row.key();
                Some(PlannedRow {
                    added: planner.selection().is_checked(&key),
                    key,
                    original_index: original,
                    brand: row.text(&Field::Brand),
                    product: row.text(&Field::Product),
                    size: row.text(&Field::Size),
                    days_of_inventory: row.number(&Field::DaysOfInventory),
                    inventory: row.number(&Field::Inventory),
                    sales_30_day: row.number(&Field::Sales30Day),
                    increment: planner.increment(original),
                    units: planner.quantity(original),
                    edited: planner.quantities().is_edited(original),
                })
            })
            .collect();

        Self {
            rows,
            summary: planner.summary(),
            popular: planner.filters().popular,
            order: describe_order(planner.order()),
        }
    }
}

/// Human-readable description of an order state.
pub fn describe_order(order: &OrderState) -> String {
    match order {
        OrderState::NoOrder => "default".to_string(),
        OrderState::LiveSort(spec) => format!("{} {}", spec.column, spec.direction),
        OrderState::CapturedOrder(keys) => format!("captured ({} rows)", keys.len()),
    }
}
