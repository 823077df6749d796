//! CSV report generator.

use super::{PlanReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::model::format_number;
use std::fmt::Write;

/// CSV reporter, one line per visible row.
pub struct CsvReporter;

impl CsvReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

const HEADER: &str = "key,original_index,brand,product,size,days_of_inventory,inventory,sales_30_day,increment,units,edited,added";

impl ReportGenerator for CsvReporter {
    fn generate_plan_report(
        &self,
        plan: &PlanReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "{HEADER}")?;

        for row in plan.rows.iter().take(config.limit.unwrap_or(usize::MAX)) {
            writeln!(
                out,
                "\"{}\",{},\"{}\",\"{}\",\"{}\",{},{},{},{},{},{},{}",
                escape_csv(&row.key),
                row.original_index,
                escape_csv(&row.brand),
                escape_csv(&row.product),
                escape_csv(&row.size),
                format_number(row.days_of_inventory),
                format_number(row.inventory),
                format_number(row.sales_30_day),
                row.increment,
                row.units,
                row.edited,
                row.added,
            )?;
        }

        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// Escape a string for use inside a double-quoted CSV field.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_plan;

    #[test]
    fn test_csv_rows_and_quoting() {
        let out = CsvReporter::new()
            .generate_plan_report(&sample_plan(), &ReportConfig::default())
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("\"A\",0,\"The Plant Shoppe\""));
        assert!(lines[1].ends_with(",60,120,false,true"));
        assert!(lines[2].contains("\"Acme, Inc.\""));
        assert!(lines[2].contains("\"Potting \"\"Mix\"\"\""));
    }

    #[test]
    fn test_escape_newlines() {
        assert_eq!(escape_csv("a\nb"), "a b");
    }
}
