//! Configuration module for shipment-planner.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shipment_planner::config::PlannerConfig;
//!
//! let config = PlannerConfig::builder()
//!     .overstock_threshold_days(120.0)
//!     .quiet(true)
//!     .build();
//!
//! use shipment_planner::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.shipment-planner.yaml` file in your project root or
//! `~/.config/shipment-planner/`:
//!
//! ```yaml
//! planning:
//!   overstock_threshold_days: 120
//! increments:
//!   - pattern: '\bjar\b'
//!     increment: 6
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{default_best_sellers, DEFAULT_LOW_STOCK_DAYS, DEFAULT_OVERSTOCK_DAYS};
pub use types::{
    BehaviorConfig, BestSellerEntry, BestSellersConfig, IncrementOverride, OutputConfig,
    PlanConfig, PlannerConfig, PlannerConfigBuilder, PlanningConfig, PlanningOverrides,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `.shipment-planner.yaml` format.
///
/// Editors can use it for validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(PlannerConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
