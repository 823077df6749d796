//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::{PlannerConfig, PlanningOverrides};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".shipment-planner.yaml",
    ".shipment-planner.yml",
    "shipment-planner.yaml",
    "shipment-planner.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/shipment-planner/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("shipment-planner")) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load a `PlannerConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<PlannerConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: PlannerConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (PlannerConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (PlannerConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (PlannerConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl PlannerConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// Used to layer CLI args over file config. Planning thresholds are not
    /// merged here; they come through [`PlanningOverrides`].
    pub fn merge(&mut self, other: &Self) {
        // User rules from the override layer are evaluated first
        if !other.increments.is_empty() {
            let mut rules = other.increments.clone();
            rules.extend(self.increments.iter().cloned());
            self.increments = rules;
        }

        if other.output.format != crate::reports::ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.fail_on_empty {
            self.behavior.fail_on_empty = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
        planning: &PlanningOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        config.planning.apply_overrides(planning);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = PlannerConfig::default();
    format!(
        r"# Shipment Planner Configuration
# Place this file at .shipment-planner.yaml in your project root or ~/.config/shipment-planner/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r#"# Shipment Planner Configuration File
# ===================================
#
# Place it at:
#   - .shipment-planner.yaml in your project root
#   - ~/.config/shipment-planner/shipment-planner.yaml for global config
#
# CLI arguments always override values from this file.

# Thresholds for the popular filters
planning:
  # Rows with more days of inventory than this are "Overstock"
  overstock_threshold_days: 180
  # Rows with days of inventory above 0 and below this are "Low Stock"
  low_stock_days: 30

# Ranked best sellers, highest first. `product` and `size` are
# case-insensitive substrings of the row's product name and size label.
best_sellers:
  entries:
    - product: indoor plant food
      size: 8oz
    - product: worm castings
      size: 1 lb

# Extra case-pack rules, evaluated before the built-in table
# (8oz=60, 6oz/half pound=40, 1lb=25, 25lb=1, 5lb=5, gallon=4, quart=12).
increments:
  - pattern: '\bsample\b'
    increment: 100
    label: sample pack

# Output settings
output:
  # Format: auto, table, json, csv
  format: auto
  # Output file (omit for stdout)
  # file: plan.json
  no_color: false

# Behavior settings
behavior:
  quiet: false
  # Exit with code 1 when no rows are visible after filtering
  fail_on_empty: false
"#
    .to_string()
}
