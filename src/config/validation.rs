//! Configuration validation for shipment-planner.

use super::types::*;
use regex::Regex;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for PlannerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.planning.validate());
        errors.extend(self.best_sellers.validate());
        for (i, rule) in self.increments.iter().enumerate() {
            errors.extend(rule.validate().into_iter().map(|mut e| {
                e.field = format!("increments[{i}].{}", e.field);
                e
            }));
        }
        errors
    }
}

impl Validatable for PlanningConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("planning.overstock_threshold_days", self.overstock_threshold_days),
            ("planning.low_stock_days", self.low_stock_days),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError {
                    field: field.to_string(),
                    message: format!("Must be a non-negative number of days, got {value}"),
                });
            }
        }

        if self.low_stock_days > self.overstock_threshold_days {
            errors.push(ConfigError {
                field: "planning.low_stock_days".to_string(),
                message: format!(
                    "Low-stock threshold ({}) exceeds overstock threshold ({})",
                    self.low_stock_days, self.overstock_threshold_days
                ),
            });
        }

        errors
    }
}

impl Validatable for BestSellersConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.product.trim().is_empty())
            .map(|(i, _)| ConfigError {
                field: format!("best_sellers.entries[{i}].product"),
                message: "Product must not be empty".to_string(),
            })
            .collect()
    }
}

impl Validatable for IncrementOverride {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.increment < 1 {
            errors.push(ConfigError {
                field: "increment".to_string(),
                message: format!("Increment must be at least 1, got {}", self.increment),
            });
        }

        if let Err(e) = Regex::new(&self.pattern) {
            errors.push(ConfigError {
                field: "pattern".to_string(),
                message: format!("Invalid regular expression: {e}"),
            });
        }

        errors
    }
}

impl Validatable for PlanConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.rows_path.exists() {
            errors.push(ConfigError {
                field: "rows_path".to_string(),
                message: format!("File not found: {}", self.rows_path.display()),
            });
        }

        if let Some(ref state) = self.state_path {
            if !state.exists() {
                errors.push(ConfigError {
                    field: "state_path".to_string(),
                    message: format!("State file not found: {}", state.display()),
                });
            }
        }

        if self.limit == Some(0) {
            errors.push(ConfigError {
                field: "limit".to_string(),
                message: "Limit must be at least 1".to_string(),
            });
        }

        errors.extend(self.planner.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().is_valid());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = PlannerConfig::builder().overstock_threshold_days(-1.0).build();
        let errors = config.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "planning.overstock_threshold_days"));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = PlannerConfig::builder()
            .overstock_threshold_days(20.0)
            .low_stock_days(40.0)
            .build();
        assert!(!config.is_valid());
    }

    #[test]
    fn test_bad_increment_rule_is_located() {
        let config = PlannerConfig::builder()
            .increment_override(IncrementOverride {
                pattern: "[".to_string(),
                increment: 0,
                label: None,
            })
            .build();
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"increments[0].increment".to_string()));
        assert!(fields.contains(&"increments[0].pattern".to_string()));
    }

    #[test]
    fn test_empty_best_seller_rejected() {
        let config = PlannerConfig::builder()
            .best_sellers(vec![BestSellerEntry::new("  ", None)])
            .build();
        assert_eq!(
            config.validate()[0].field,
            "best_sellers.entries[0].product"
        );
    }

    #[test]
    fn test_plan_config_missing_rows() {
        let config = PlanConfig::new("/nonexistent/rows.json");
        assert!(config.validate().iter().any(|e| e.field == "rows_path"));
    }
}
