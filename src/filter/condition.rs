//! Operator-based column conditions.

use crate::model::{parse_number, FieldValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a column condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    IsEmpty,
    IsNotEmpty,
    Between,
    NotBetween,
}

impl ConditionOperator {
    pub const ALL: &'static [Self] = &[
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::EndsWith,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::IsEmpty,
        Self::IsNotEmpty,
        Self::Between,
        Self::NotBetween,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::LessOrEqual => "lessOrEqual",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::Between => "between",
            Self::NotBetween => "notBetween",
        }
    }

    /// Operators that always compare numerically.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::GreaterThan
                | Self::LessThan
                | Self::GreaterOrEqual
                | Self::LessOrEqual
                | Self::Between
                | Self::NotBetween
        )
    }

    /// Number of operands the operator reads.
    pub const fn arity(self) -> usize {
        match self {
            Self::IsEmpty | Self::IsNotEmpty => 0,
            Self::Between | Self::NotBetween => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConditionOperator {
    type Err = String;

    /// Accepts the camelCase name in any case, plus the usual symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = match s.trim() {
            "=" | "==" => Some(Self::Equals),
            "!=" | "<>" => Some(Self::NotEquals),
            ">" => Some(Self::GreaterThan),
            "<" => Some(Self::LessThan),
            ">=" => Some(Self::GreaterOrEqual),
            "<=" => Some(Self::LessOrEqual),
            _ => None,
        };
        if let Some(op) = symbol {
            return Ok(op);
        }

        let wanted = s.trim().replace(['_', '-'], "");
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown condition operator '{s}'"))
    }
}

/// A condition on one column: operator plus up to two operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

impl Condition {
    pub fn new(operator: ConditionOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
            value2: None,
        }
    }

    pub fn between(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            operator: ConditionOperator::Between,
            value: low.into(),
            value2: Some(high.into()),
        }
    }

    #[must_use]
    pub fn with_second(mut self, value2: impl Into<String>) -> Self {
        self.value2 = Some(value2.into());
        self
    }

    /// Evaluate against a resolved cell.
    ///
    /// `numeric_column` makes `equals`/`notEquals` compare numbers instead
    /// of case-insensitive text. Numeric comparisons coerce both sides, so
    /// non-numeric text reads as 0.
    pub fn matches(&self, cell: &FieldValue, numeric_column: bool) -> bool {
        use ConditionOperator as Op;

        let number = || cell.as_number();
        let operand = || parse_number(&self.value).unwrap_or(0.0);
        let text = || cell.display().to_lowercase();
        let needle = || self.value.trim().to_lowercase();

        match self.operator {
            Op::Equals | Op::NotEquals => {
                let equal = if numeric_column {
                    (number() - operand()).abs() < f64::EPSILON
                } else {
                    text().trim() == needle()
                };
                equal == (self.operator == Op::Equals)
            }
            Op::Contains => text().contains(&needle()),
            Op::NotContains => !text().contains(&needle()),
            Op::StartsWith => text().trim_start().starts_with(&needle()),
            Op::EndsWith => text().trim_end().ends_with(&needle()),
            Op::GreaterThan => number() > operand(),
            Op::LessThan => number() < operand(),
            Op::GreaterOrEqual => number() >= operand(),
            Op::LessOrEqual => number() <= operand(),
            Op::IsEmpty => cell.is_empty(),
            Op::IsNotEmpty => !cell.is_empty(),
            Op::Between | Op::NotBetween => {
                let a = operand();
                let b = self
                    .value2
                    .as_deref()
                    .and_then(parse_number)
                    .unwrap_or(0.0);
                let (low, high) = if a <= b { (a, b) } else { (b, a) };
                let n = number();
                let inside = n >= low && n <= high;
                inside == (self.operator == Op::Between)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let cond = Condition::new(ConditionOperator::Contains, "shop");
        assert!(cond.matches(&text("The Plant Shoppe"), false));
        assert!(!cond.matches(&text("Acme"), false));
    }

    #[test]
    fn test_numeric_operators_coerce_text_to_zero() {
        let gt = Condition::new(ConditionOperator::GreaterThan, "-1");
        assert!(gt.matches(&text("n/a"), true));
        let lt = Condition::new(ConditionOperator::LessThan, "5");
        assert!(lt.matches(&text("n/a"), false));
        let gt_junk = Condition::new(ConditionOperator::GreaterThan, "junk");
        assert!(gt_junk.matches(&FieldValue::Number(3.0), true));
    }

    #[test]
    fn test_between_is_inclusive_and_order_free() {
        let cond = Condition::between("100", "10");
        assert!(cond.matches(&FieldValue::Number(10.0), true));
        assert!(cond.matches(&FieldValue::Number(100.0), true));
        assert!(!cond.matches(&FieldValue::Number(101.0), true));

        let outside = Condition::between("10", "100").with_second("20");
        assert_eq!(outside.value2.as_deref(), Some("20"));
        let not = Condition {
            operator: ConditionOperator::NotBetween,
            ..Condition::between("10", "20")
        };
        assert!(not.matches(&FieldValue::Number(25.0), true));
        assert!(!not.matches(&FieldValue::Number(15.0), true));
    }

    #[test]
    fn test_equals_numeric_vs_text() {
        let cond = Condition::new(ConditionOperator::Equals, "1,200");
        assert!(cond.matches(&FieldValue::Number(1200.0), true));
        let cond = Condition::new(ConditionOperator::Equals, "ACME");
        assert!(cond.matches(&text("acme"), false));
        let cond = Condition::new(ConditionOperator::NotEquals, "acme");
        assert!(!cond.matches(&text("Acme"), false));
    }

    #[test]
    fn test_empty_checks() {
        let empty = Condition::new(ConditionOperator::IsEmpty, "");
        assert!(empty.matches(&FieldValue::Empty, false));
        assert!(empty.matches(&text("   "), false));
        assert!(!empty.matches(&FieldValue::Number(0.0), true));
        let not_empty = Condition::new(ConditionOperator::IsNotEmpty, "");
        assert!(not_empty.matches(&text("A1"), false));
    }

    #[test]
    fn test_starts_and_ends_with() {
        let starts = Condition::new(ConditionOperator::StartsWith, "indoor");
        assert!(starts.matches(&text("Indoor Plant Food"), false));
        let ends = Condition::new(ConditionOperator::EndsWith, "FOOD");
        assert!(ends.matches(&text("Indoor Plant Food"), false));
    }

    #[test]
    fn test_operator_parsing() {
        assert_eq!("greaterThan".parse(), Ok(ConditionOperator::GreaterThan));
        assert_eq!("not_between".parse(), Ok(ConditionOperator::NotBetween));
        assert_eq!(">=".parse(), Ok(ConditionOperator::GreaterOrEqual));
        assert!("approximately".parse::<ConditionOperator>().is_err());
        for op in ConditionOperator::ALL {
            assert_eq!(op.name().parse(), Ok(*op));
        }
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_string(&ConditionOperator::GreaterOrEqual).unwrap();
        assert_eq!(json, "\"greaterOrEqual\"");
    }
}
