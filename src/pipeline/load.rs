//! Loading product rows and saved table state from disk.

use crate::api::ApiResponse;
use crate::error::{ErrorContext, LoadErrorKind, PlannerError, Result};
use crate::model::ProductRow;
use crate::planner::TableState;
use serde_json::Value;
use std::path::Path;

/// Parse rows from JSON text.
///
/// Accepts a bare array of objects, an object with a `rows` array, or an
/// [`ApiResponse`] envelope whose `data` is either of those.
pub fn parse_rows(content: &str) -> Result<Vec<ProductRow>> {
    let value: Value = serde_json::from_str(content)?;
    rows_from_value(value)
}

fn rows_from_value(value: Value) -> Result<Vec<ProductRow>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(ProductRow::from(map)),
                _ => Err(PlannerError::load(
                    "reading rows",
                    LoadErrorKind::RowNotObject { index },
                )),
            })
            .collect(),
        Value::Object(mut map) => {
            if map.contains_key("success") {
                let envelope: ApiResponse<Value> = serde_json::from_value(Value::Object(map))?;
                let data = envelope.into_result().context("unwrapping response envelope")?;
                return rows_from_value(data);
            }
            match map.remove("rows") {
                Some(rows) => rows_from_value(rows),
                None => Err(not_rows("an object without a `rows` array")),
            }
        }
        other => Err(not_rows(describe(&other))),
    }
}

fn not_rows(found: impl Into<String>) -> PlannerError {
    PlannerError::load("reading rows", LoadErrorKind::NotARowArray(found.into()))
}

const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and parse a rows file.
pub fn load_rows(path: &Path) -> Result<Vec<ProductRow>> {
    tracing::debug!("Reading rows from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;
    let rows = parse_rows(&content).with_context(|| path.display().to_string())?;
    tracing::debug!("Read {} rows", rows.len());
    Ok(rows)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Read a saved table state. `.yaml`/`.yml` files are YAML, anything else
/// is JSON.
pub fn load_state(path: &Path) -> Result<TableState> {
    let content = std::fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;
    let state: TableState = if is_yaml(path) {
        serde_yaml::from_str(&content).with_context(|| path.display().to_string())?
    } else {
        serde_json::from_str(&content).with_context(|| path.display().to_string())?
    };
    Ok(state)
}

/// Write a table state, choosing the format from the extension like
/// [`load_state`].
pub fn save_state(path: &Path, state: &TableState) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(state)?
    } else {
        serde_json::to_string_pretty(state)?
    };
    std::fs::write(path, content).map_err(|e| PlannerError::io(path, e))?;
    tracing::info!("Table state written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bare_array() {
        let rows = parse_rows(r#"[{"id": "A"}, {"id": "B", "_originalIndex": 9}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].original_index, Some(9));
    }

    #[test]
    fn test_rows_object_and_envelope() {
        let rows = parse_rows(r#"{"rows": [{"id": "A"}]}"#).unwrap();
        assert_eq!(rows[0].key(), "A");

        let rows = parse_rows(r#"{"success": true, "data": {"rows": [{"sku": "S1"}]}}"#).unwrap();
        assert_eq!(rows[0].key(), "S1");

        let err = parse_rows(r#"{"success": false, "error": "upstream down"}"#).unwrap_err();
        assert!(matches!(err, PlannerError::Api(ref m) if m.contains("upstream down")));
    }

    #[test]
    fn test_rejects_non_rows() {
        assert!(matches!(
            parse_rows("42"),
            Err(PlannerError::Load {
                source: LoadErrorKind::NotARowArray(_),
                ..
            })
        ));
        assert!(matches!(
            parse_rows(r#"[{"id": "A"}, 3]"#),
            Err(PlannerError::Load {
                source: LoadErrorKind::RowNotObject { index: 1 },
                ..
            })
        ));
        assert!(parse_rows("{not json").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_rows(Path::new("/nonexistent/rows.json")).unwrap_err();
        assert!(matches!(err, PlannerError::Io { path: Some(_), .. }));
    }

    #[test]
    fn test_state_roundtrip_in_both_formats() {
        let tmp = TempDir::new().unwrap();
        let mut state = TableState::default();
        state.checked.insert("A".into());
        state.edited.insert(2);

        for name in ["state.yaml", "state.json"] {
            let path = tmp.path().join(name);
            save_state(&path, &state).unwrap();
            assert_eq!(load_state(&path).unwrap(), state);
        }
        let json = std::fs::read_to_string(tmp.path().join("state.json")).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }
}
