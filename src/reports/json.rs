//! JSON report generator.

use super::{
    PlanReport, PlannedRow, ReportConfig, ReportError, ReportFormat, ReportGenerator,
    ReportMetadata,
};
use crate::planner::ShipmentSummary;
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_plan_report(
        &self,
        plan: &PlanReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let limit = config.limit.unwrap_or(usize::MAX);
        let report = JsonPlanReport {
            metadata: JsonMetadata {
                tool: ToolInfo {
                    name: "shipment-planner".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                generated_at: Utc::now().to_rfc3339(),
                source: config.metadata.clone(),
            },
            summary: plan.summary,
            popular: plan.popular.map(|p| p.to_string()),
            order: &plan.order,
            truncated: plan.rows.len() > limit,
            rows: plan.rows.iter().take(limit).collect(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPlanReport<'a> {
    metadata: JsonMetadata,
    summary: ShipmentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    popular: Option<String>,
    order: &'a str,
    truncated: bool,
    rows: Vec<&'a PlannedRow>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMetadata {
    tool: ToolInfo,
    generated_at: String,
    source: ReportMetadata,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_plan;
    use serde_json::Value;

    #[test]
    fn test_json_shape() {
        let out = JsonReporter::new()
            .generate_plan_report(&sample_plan(), &ReportConfig::default())
            .unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["metadata"]["tool"]["name"], "shipment-planner");
        assert!(v["metadata"]["generatedAt"].is_string());
        assert_eq!(v["summary"]["added_units"], 120);
        assert_eq!(v["rows"][0]["key"], "A");
        assert_eq!(v["rows"][0]["originalIndex"], 0);
        assert_eq!(v["rows"][1]["edited"], true);
        assert_eq!(v["truncated"], false);
    }

    #[test]
    fn test_json_limit_and_compact() {
        let config = ReportConfig {
            limit: Some(1),
            metadata: ReportMetadata {
                rows_path: Some("rows.json".into()),
                state_path: None,
            },
        };
        let out = JsonReporter::new()
            .pretty(false)
            .generate_plan_report(&sample_plan(), &config)
            .unwrap();
        assert!(!out.contains('\n'));
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["rows"].as_array().unwrap().len(), 1);
        assert_eq!(v["truncated"], true);
        assert_eq!(v["metadata"]["source"]["rows_path"], "rows.json");
    }
}
