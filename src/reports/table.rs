//! Aligned terminal table.

use super::{PlanReport, PlannedRow, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::model::format_number;
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// (header, display width, right aligned)
const COLUMNS: [(&str, usize, bool); 9] = [
    ("Add", 3, false),
    ("Brand", 18, false),
    ("Product", 30, false),
    ("Size", 10, false),
    ("DOI", 7, true),
    ("Inv", 7, true),
    ("30d", 7, true),
    ("Case", 5, true),
    ("Units", 7, true),
];

/// Table reporter for terminal output
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn cells(row: &PlannedRow) -> [String; 9] {
        [
            if row.added { "[x]" } else { "[ ]" }.to_string(),
            row.brand.clone(),
            row.product.clone(),
            row.size.clone(),
            format_number(row.days_of_inventory),
            format_number(row.inventory),
            format_number(row.sales_30_day),
            row.increment.to_string(),
            if row.edited {
                format!("{}*", row.units)
            } else {
                row.units.to_string()
            },
        ]
    }

    fn row_color(row: &PlannedRow) -> &'static str {
        if row.added {
            "green"
        } else if row.units == 0 {
            "dim"
        } else {
            ""
        }
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_plan_report(
        &self,
        plan: &PlanReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();

        let header: Vec<String> = COLUMNS
            .iter()
            .map(|(name, width, right)| pad(name, *width, *right))
            .collect();
        writeln!(out, "{}", self.color(&header.join("  "), "bold"))?;
        let rule_width =
            COLUMNS.iter().map(|(_, w, _)| w).sum::<usize>() + 2 * (COLUMNS.len() - 1);
        writeln!(out, "{}", "─".repeat(rule_width))?;

        let limit = config.limit.unwrap_or(usize::MAX);
        for row in plan.rows.iter().take(limit) {
            let line: Vec<String> = Self::cells(row)
                .iter()
                .zip(COLUMNS.iter())
                .map(|(cell, (_, width, right))| pad(&truncate(cell, *width), *width, *right))
                .collect();
            writeln!(out, "{}", self.color(line.join("  ").trim_end(), Self::row_color(row)))?;
        }

        if plan.rows.len() > limit {
            writeln!(
                out,
                "{}",
                self.color(&format!("... and {} more", plan.rows.len() - limit), "dim")
            )?;
        }
        if plan.rows.is_empty() {
            writeln!(out, "{}", self.color("No rows match the current filters", "yellow"))?;
        }

        let s = &plan.summary;
        writeln!(out)?;
        writeln!(
            out,
            "{} {} of {} rows shown, order: {}",
            self.color("Rows:", "bold"),
            s.visible_rows,
            s.total_rows,
            plan.order
        )?;
        if let Some(popular) = plan.popular {
            writeln!(out, "{} {}", self.color("Quick filter:", "bold"), popular.label())?;
        }
        writeln!(
            out,
            "{} {} rows, {} units",
            self.color("Shipment:", "bold"),
            self.color(&s.added_rows.to_string(), "cyan"),
            self.color(&s.added_units.to_string(), "cyan"),
        )?;

        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

/// Pad to a display width.
fn pad(s: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(s.width()));
    if right {
        format!("{fill}{s}")
    } else {
        format!("{s}{fill}")
    }
}

/// Cut to a display width, marking the cut with an ellipsis.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}
