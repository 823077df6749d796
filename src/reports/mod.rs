//! Report generation for planned shipments.
//!
//! - Table: aligned terminal output
//! - JSON: structured data for programmatic integration
//! - CSV: spreadsheet import

mod csv;
mod json;
mod table;
mod types;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use table::TableReporter;
pub use types::{
    describe_order, PlanReport, PlannedRow, ReportConfig, ReportFormat, ReportMetadata,
};

use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the plan
    fn generate_plan_report(
        &self,
        plan: &PlanReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Render the plan into a writer
    fn write_plan_report(
        &self,
        plan: &PlanReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_plan_report(plan, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a reporter for a concrete format. `Auto` renders as a table.
#[must_use]
pub fn create_reporter(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
        ReportFormat::Auto | ReportFormat::Table => {
            let reporter = TableReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::planner::ShipmentSummary;

    pub fn sample_plan() -> PlanReport {
        PlanReport {
            rows: vec![
                PlannedRow {
                    key: "A".into(),
                    original_index: 0,
                    brand: "The Plant Shoppe".into(),
                    product: "Indoor Plant Food".into(),
                    size: "8oz".into(),
                    days_of_inventory: 12.0,
                    inventory: 30.0,
                    sales_30_day: 75.0,
                    increment: 60,
                    units: 120,
                    edited: false,
                    added: true,
                },
                PlannedRow {
                    key: "B".into(),
                    original_index: 1,
                    brand: "Acme, Inc.".into(),
                    product: "Potting \"Mix\"".into(),
                    size: "1 quart".into(),
                    days_of_inventory: 200.5,
                    inventory: 80.0,
                    sales_30_day: 0.0,
                    increment: 12,
                    units: 0,
                    edited: true,
                    added: false,
                },
            ],
            summary: ShipmentSummary {
                total_rows: 3,
                visible_rows: 2,
                added_rows: 1,
                added_units: 120,
                visible_units: 120,
            },
            popular: None,
            order: "default".into(),
        }
    }
}
