//! Parsers for the small expressions accepted by `plan`.
//!
//! - `--where COL:OP[:VALUE[:VALUE2]]`
//! - `--only COL=a,b,c`
//! - `--sort COL[:asc|desc]`
//! - `--qty KEY=N`

use crate::error::{PlannerError, Result};
use crate::filter::{Condition, ConditionOperator};
use crate::model::Column;
use crate::order::{SortDirection, SortSpec};
use std::collections::BTreeSet;

fn column(name: &str, expr: &str) -> Result<Column> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlannerError::validation(format!(
            "missing column name in '{expr}'"
        )));
    }
    Ok(Column::parse(name))
}

/// Parse a condition filter.
pub fn parse_where(expr: &str) -> Result<(Column, Condition)> {
    let parts: Vec<&str> = expr.splitn(4, ':').collect();
    if parts.len() < 2 {
        return Err(PlannerError::validation(format!(
            "expected COLUMN:OPERATOR[:VALUE[:VALUE2]], got '{expr}'"
        )));
    }
    let column = column(parts[0], expr)?;
    let operator: ConditionOperator = parts[1].parse().map_err(PlannerError::validation)?;
    let operands = &parts[2..];

    if operands.len() < operator.arity() {
        return Err(PlannerError::validation(format!(
            "operator {operator} needs {} value(s) in '{expr}'",
            operator.arity()
        )));
    }

    let condition = match operator.arity() {
        0 => Condition::new(operator, ""),
        1 => Condition::new(operator, operands[..].join(":")),
        _ => Condition::new(operator, operands[0]).with_second(operands[1]),
    };
    Ok((column, condition))
}

/// Parse a value-set filter. An empty list after `=` selects nothing.
pub fn parse_only(expr: &str) -> Result<(Column, BTreeSet<String>)> {
    let (name, values) = expr.split_once('=').ok_or_else(|| {
        PlannerError::validation(format!("expected COLUMN=VALUE[,VALUE...], got '{expr}'"))
    })?;
    let column = column(name, expr)?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((column, values))
}

/// Parse a sort request; ascending when no direction is given.
pub fn parse_sort(expr: &str) -> Result<SortSpec> {
    let (name, direction) = match expr.rsplit_once(':') {
        Some((name, dir)) => (name, dir.parse().map_err(PlannerError::validation)?),
        None => (expr, SortDirection::Asc),
    };
    Ok(SortSpec::new(column(name, expr)?, direction))
}

/// Parse a quantity edit.
pub fn parse_qty(expr: &str) -> Result<(String, i64)> {
    let (key, units) = expr
        .rsplit_once('=')
        .ok_or_else(|| PlannerError::validation(format!("expected KEY=UNITS, got '{expr}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(PlannerError::validation(format!("missing row key in '{expr}'")));
    }
    let units: i64 = units.trim().parse().map_err(|_| {
        PlannerError::validation(format!("'{}' is not a whole number of units", units.trim()))
    })?;
    if units < 0 {
        return Err(PlannerError::validation(format!(
            "units must not be negative in '{expr}'"
        )));
    }
    Ok((key.to_string(), units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn test_parse_where() {
        let (col, cond) = parse_where("brand:contains:acme").unwrap();
        assert_eq!(col, Column::Field(Field::Brand));
        assert_eq!(cond, Condition::new(ConditionOperator::Contains, "acme"));

        let (_, cond) = parse_where("inventory:between:10:50").unwrap();
        assert_eq!(cond, Condition::between("10", "50"));

        let (_, cond) = parse_where("size:isEmpty").unwrap();
        assert_eq!(cond.operator, ConditionOperator::IsEmpty);

        let (_, cond) = parse_where("doi:>=:180").unwrap();
        assert_eq!(cond.operator, ConditionOperator::GreaterOrEqual);

        // Single-operand values keep their colons
        let (_, cond) = parse_where("product:equals:a:b").unwrap();
        assert_eq!(cond.value, "a:b");
    }

    #[test]
    fn test_parse_where_rejects_malformed() {
        assert!(matches!(parse_where("brand"), Err(PlannerError::Validation(_))));
        assert!(matches!(parse_where("brand:sortof:x"), Err(PlannerError::Validation(_))));
        assert!(matches!(parse_where("doi:between:1"), Err(PlannerError::Validation(_))));
        assert!(matches!(parse_where(":equals:x"), Err(PlannerError::Validation(_))));
        assert!(matches!(parse_where("doi:greaterThan"), Err(PlannerError::Validation(_))));
    }

    #[test]
    fn test_parse_only() {
        let (col, values) = parse_only("brand= Acme , Zed").unwrap();
        assert_eq!(col, Column::Field(Field::Brand));
        assert_eq!(values.into_iter().collect::<Vec<_>>(), vec!["Acme", "Zed"]);

        let (col, values) = parse_only("added=").unwrap();
        assert_eq!(col, Column::Added);
        assert!(values.is_empty());

        assert!(parse_only("brand").is_err());
    }

    #[test]
    fn test_parse_sort() {
        let spec = parse_sort("doi:desc").unwrap();
        assert_eq!(spec.column, Column::Field(Field::DaysOfInventory));
        assert_eq!(spec.direction, SortDirection::Desc);
        assert_eq!(parse_sort("brand").unwrap().direction, SortDirection::Asc);
        assert!(parse_sort("brand:sideways").is_err());
    }

    #[test]
    fn test_parse_qty() {
        assert_eq!(parse_qty("SKU-1=120").unwrap(), ("SKU-1".to_string(), 120));
        assert_eq!(parse_qty("a=b=5").unwrap(), ("a=b".to_string(), 5));
        assert!(parse_qty("SKU-1").is_err());
        assert!(parse_qty("SKU-1=lots").is_err());
        assert!(parse_qty("SKU-1=-5").is_err());
        assert!(parse_qty("=5").is_err());
    }
}
