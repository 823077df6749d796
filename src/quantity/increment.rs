//! Case-pack increments derived from size/product text.
//!
//! Physical case packs differ per package size, and ordering partial cases
//! is not possible, so planned quantities are rounded to the pack size of
//! the row. The pack size is looked up from the row's size label (falling
//! back to its product name) against an ordered table; the first matching
//! rule wins and rows matching nothing use an increment of 1.

use crate::config::IncrementOverride;
use crate::error::{PlannerError, Result};
use crate::model::ProductRow;
use regex::Regex;
use std::sync::LazyLock;

/// Built-in packaging rules, in precedence order.
const BUILTIN_RULES: &[(&str, &str, i64)] = &[
    ("8oz", r"\b8\s*-?\s*(?:oz|ounces?)\b", 60),
    (
        "6oz / half pound",
        r"\b6\s*-?\s*(?:oz|ounces?)\b|\b1/2\s*-?\s*(?:lbs?|pounds?)\b|\bhalf[\s-]*(?:lbs?|pounds?)\b|(?:^|[^\d])0?\.5\s*-?\s*(?:lbs?|pounds?)\b",
        40,
    ),
    ("1lb", r"(?:^|[^\d./])1\s*-?\s*(?:lbs?|pounds?)\b", 25),
    ("25lb", r"\b25\s*-?\s*(?:lbs?|pounds?)\b", 1),
    ("5lb", r"(?:^|[^\d./])5\s*-?\s*(?:lbs?|pounds?)\b", 5),
    ("gallon", r"\bgal(?:lon)?s?\b", 4),
    ("quart", r"\bquarts?\b|\bqts?\b", 12),
];

static BUILTIN: LazyLock<IncrementResolver> = LazyLock::new(IncrementResolver::builtin);

/// A single packaging rule.
#[derive(Debug, Clone)]
pub struct IncrementRule {
    /// Human-readable name of the package family
    pub label: String,
    pattern: Regex,
    /// Units per case pack
    pub increment: i64,
}

impl IncrementRule {
    pub fn matches(&self, normalized_text: &str) -> bool {
        self.pattern.is_match(normalized_text)
    }
}

/// Ordered packaging rule table.
#[derive(Debug, Clone)]
pub struct IncrementResolver {
    rules: Vec<IncrementRule>,
}

impl Default for IncrementResolver {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl IncrementResolver {
    /// The built-in table.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(label, pattern, increment)| IncrementRule {
                label: (*label).to_string(),
                pattern: Regex::new(pattern).expect("static regex"),
                increment: *increment,
            })
            .collect();
        Self { rules }
    }

    /// Built-in table with user rules evaluated first.
    pub fn with_overrides(overrides: &[IncrementOverride]) -> Result<Self> {
        let mut rules = Vec::with_capacity(overrides.len() + BUILTIN_RULES.len());
        for rule in overrides {
            if rule.increment < 1 {
                return Err(PlannerError::config(format!(
                    "increment for pattern '{}' must be at least 1, got {}",
                    rule.pattern, rule.increment
                )));
            }
            let pattern = Regex::new(&format!("(?i){}", rule.pattern)).map_err(|e| {
                PlannerError::config(format!("invalid increment pattern '{}': {e}", rule.pattern))
            })?;
            rules.push(IncrementRule {
                label: rule.label.clone().unwrap_or_else(|| rule.pattern.clone()),
                pattern,
                increment: rule.increment,
            });
        }
        rules.extend(BUILTIN.rules.iter().cloned());
        Ok(Self { rules })
    }

    /// First rule matching the text, if any.
    pub fn matching_rule(&self, text: &str) -> Option<&IncrementRule> {
        let normalized = normalize_packaging_text(text);
        self.rules.iter().find(|r| r.matches(&normalized))
    }

    /// Increment for arbitrary packaging text; 1 when nothing matches.
    pub fn resolve(&self, text: &str) -> i64 {
        self.matching_rule(text).map_or(1, |r| r.increment)
    }

    /// Increment for a row (size label, else product name).
    pub fn resolve_row(&self, row: &ProductRow) -> i64 {
        self.resolve(&row.packaging_text())
    }

    pub fn rules(&self) -> &[IncrementRule] {
        &self.rules
    }
}

/// Resolve text against the built-in table.
pub fn resolve_increment(text: &str) -> i64 {
    BUILTIN.resolve(text)
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize_packaging_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Rounding helpers
// ============================================================================
//
// All helpers return values <= 0 unchanged, and treat an increment <= 1 as
// "no rounding". A multiple above i64::MAX falls back to the one below.

/// Next multiple above `value`, or the one below when that overflows.
const fn next_multiple(value: i64, increment: i64) -> i64 {
    let below = value - value % increment;
    match below.checked_add(increment) {
        Some(above) => above,
        None => below,
    }
}

/// Round to the nearest multiple; ties round up (away from zero).
pub const fn round_nearest(value: i64, increment: i64) -> i64 {
    if value <= 0 || increment <= 1 {
        return value;
    }
    let rem = value % increment;
    if rem == 0 || rem < increment - rem {
        value - rem
    } else {
        next_multiple(value, increment)
    }
}

/// Round up to the next multiple; exact multiples are unchanged.
pub const fn round_up(value: i64, increment: i64) -> i64 {
    if value <= 0 || increment <= 1 || value % increment == 0 {
        return value;
    }
    next_multiple(value, increment)
}

/// Round down to the previous multiple, never below 0.
pub const fn round_down(value: i64, increment: i64) -> i64 {
    if value <= 0 || increment <= 1 {
        return value;
    }
    (value / increment) * increment
}

/// The multiple strictly above `value` (the "+" control).
pub const fn step_up(value: i64, increment: i64) -> i64 {
    let increment = if increment < 1 { 1 } else { increment };
    let value = if value < 0 { 0 } else { value };
    next_multiple(value, increment)
}

/// The multiple strictly below `value`, floored at 0 (the "-" control).
pub const fn step_down(value: i64, increment: i64) -> i64 {
    let increment = if increment < 1 { 1 } else { increment };
    if value <= 0 {
        return 0;
    }
    ((value - 1) / increment) * increment
}
