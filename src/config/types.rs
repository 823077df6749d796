//! Configuration types for shipment-planner.

use super::defaults::{default_best_sellers, DEFAULT_LOW_STOCK_DAYS, DEFAULT_OVERSTOCK_DAYS};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a config file and/or CLI arguments
/// (CLI wins).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlannerConfig {
    /// Thresholds used by the popular filters
    pub planning: PlanningConfig,
    /// Ranked allow-list behind the "Best Sellers" popular filter
    pub best_sellers: BestSellersConfig,
    /// Case-pack rules evaluated before the built-in table
    pub increments: Vec<IncrementOverride>,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl PlannerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PlannerConfigBuilder {
        PlannerConfigBuilder::default()
    }
}

// ============================================================================
// Builder for PlannerConfig
// ============================================================================

/// Builder for constructing `PlannerConfig` with a fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct PlannerConfigBuilder {
    config: PlannerConfig,
}

impl PlannerConfigBuilder {
    pub const fn overstock_threshold_days(mut self, days: f64) -> Self {
        self.config.planning.overstock_threshold_days = days;
        self
    }

    pub const fn low_stock_days(mut self, days: f64) -> Self {
        self.config.planning.low_stock_days = days;
        self
    }

    pub fn best_sellers(mut self, entries: Vec<BestSellerEntry>) -> Self {
        self.config.best_sellers.entries = entries;
        self
    }

    pub fn increment_override(mut self, rule: IncrementOverride) -> Self {
        self.config.increments.push(rule);
        self
    }

    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    #[must_use]
    pub fn build(self) -> PlannerConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Thresholds for inventory-based popular filters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlanningConfig {
    /// Rows with more days of inventory than this are "Overstock"
    pub overstock_threshold_days: f64,
    /// Rows with fewer (but some) days of inventory are "Low Stock"
    pub low_stock_days: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            overstock_threshold_days: DEFAULT_OVERSTOCK_DAYS,
            low_stock_days: DEFAULT_LOW_STOCK_DAYS,
        }
    }
}

impl PlanningConfig {
    /// Replace every threshold the overrides set, including ones equal to
    /// the defaults.
    pub fn apply_overrides(&mut self, overrides: &PlanningOverrides) {
        if let Some(days) = overrides.overstock_threshold_days {
            self.overstock_threshold_days = days;
        }
        if let Some(days) = overrides.low_stock_days {
            self.low_stock_days = days;
        }
    }
}

/// Planning thresholds given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanningOverrides {
    pub overstock_threshold_days: Option<f64>,
    pub low_stock_days: Option<f64>,
}

/// Ranked best-seller list. Earlier entries rank higher.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BestSellersConfig {
    pub entries: Vec<BestSellerEntry>,
}

impl Default for BestSellersConfig {
    fn default() -> Self {
        Self {
            entries: default_best_sellers(),
        }
    }
}

/// One best-seller: a product-name substring, optionally narrowed by size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BestSellerEntry {
    /// Case-insensitive substring of the product name
    pub product: String,
    /// Case-insensitive substring of the size label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl BestSellerEntry {
    pub fn new(product: impl Into<String>, size: Option<&str>) -> Self {
        Self {
            product: product.into(),
            size: size.map(str::to_string),
        }
    }
}

/// A user-defined case-pack rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncrementOverride {
    /// Regular expression matched (case-insensitively) against the
    /// normalized size/product text
    pub pattern: String,
    /// Units per case pack (at least 1)
    pub increment: i64,
    /// Optional display label for the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
    /// Exit with code 1 when the plan shows no rows
    pub fail_on_empty: bool,
}

// ============================================================================
// Command configuration
// ============================================================================

/// Configuration for the `plan` command.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Product rows (JSON)
    pub rows_path: PathBuf,
    /// Saved table state to resume from (YAML or JSON)
    pub state_path: Option<PathBuf>,
    /// Where to write the table state after applying this run's edits
    pub save_state: Option<PathBuf>,
    /// Maximum rows to render
    pub limit: Option<usize>,
    /// Effective planner configuration
    pub planner: PlannerConfig,
}

impl PlanConfig {
    pub fn new(rows_path: impl Into<PathBuf>) -> Self {
        Self {
            rows_path: rows_path.into(),
            state_path: None,
            save_state: None,
            limit: None,
            planner: PlannerConfig::default(),
        }
    }
}
