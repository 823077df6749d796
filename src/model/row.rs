//! Product rows as supplied by the caller.

use super::field::{parse_number, Field, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One sellable product/variant.
///
/// Rows are loosely typed records; all reads go through [`ProductRow::get`]
/// which understands the synonym lists of [`Field`]. The pipeline never
/// mutates a caller's row, it works on annotated copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    /// Position of the row in the first array it was seen in
    #[serde(
        rename = "_originalIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_index: Option<usize>,
    /// Every other column, as received
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ProductRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Raw record value for an exact key.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Resolve a field, trying its synonyms in order.
    ///
    /// Missing canonical fields resolve to a typed default: `0` for numeric
    /// fields and an empty string for text fields. Missing custom columns
    /// resolve to [`FieldValue::Empty`].
    pub fn get(&self, field: &Field) -> FieldValue {
        if let Field::Custom(key) = field {
            return match self.raw(key) {
                Some(Value::Number(n)) => n.as_f64().map_or(FieldValue::Empty, FieldValue::Number),
                Some(Value::String(s)) => FieldValue::Text(s.clone()),
                Some(other) => FieldValue::Text(other.to_string()),
                None => FieldValue::Empty,
            };
        }

        let found = field.synonyms().iter().find_map(|key| self.raw(key));
        if field.is_numeric() {
            let n = match found {
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(Value::String(s)) => parse_number(s).unwrap_or(0.0),
                _ => 0.0,
            };
            FieldValue::Number(n)
        } else {
            let s = match found {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => String::new(),
            };
            FieldValue::Text(s)
        }
    }

    /// Numeric read; non-numeric or missing values read as 0.
    pub fn number(&self, field: &Field) -> f64 {
        self.get(field).as_number()
    }

    /// Text read; missing values read as an empty string.
    pub fn text(&self, field: &Field) -> String {
        self.get(field).display()
    }

    /// Stable identifier of the row: its id, or `#<originalIndex>` when the
    /// record has none.
    pub fn key(&self) -> String {
        let id = self.text(&Field::Id);
        let id = id.trim();
        if id.is_empty() {
            format!("#{}", self.original_index.unwrap_or_default())
        } else {
            id.to_string()
        }
    }

    /// Any trailing sales in the 7/30/90 day windows.
    pub fn has_sales_history(&self) -> bool {
        [Field::Sales7Day, Field::Sales30Day, Field::Sales90Day]
            .iter()
            .any(|f| self.number(f) > 0.0)
    }

    /// Caller-suggested units, rounded to whole units and floored at 0.
    pub fn suggested_units(&self) -> i64 {
        let n = self.number(&Field::SuggestedQty);
        if n > 0.0 {
            n.round() as i64
        } else {
            0
        }
    }

    /// Text used to derive the case-pack increment: the size label, falling
    /// back to the product name.
    pub fn packaging_text(&self) -> String {
        let size = self.text(&Field::Size);
        if size.trim().is_empty() {
            self.text(&Field::Product)
        } else {
            size
        }
    }
}

impl From<Map<String, Value>> for ProductRow {
    fn from(mut fields: Map<String, Value>) -> Self {
        let original_index = fields
            .remove("_originalIndex")
            .and_then(|v| v.as_u64())
            .and_then(|n| usize::try_from(n).ok());
        Self {
            original_index,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_synonym_resolution() {
        let row = ProductRow::new()
            .with("daysOfInventory", 42)
            .with("sales_7_day", "3");
        assert_eq!(row.number(&Field::DaysOfInventory), 42.0);
        assert_eq!(row.number(&Field::Sales7Day), 3.0);
        assert!(row.has_sales_history());
    }

    #[test]
    fn test_first_synonym_wins() {
        let row = ProductRow::new().with("doiTotal", 10).with("daysOfInventory", 99);
        assert_eq!(row.number(&Field::DaysOfInventory), 10.0);
    }

    #[test]
    fn test_typed_defaults() {
        let row = ProductRow::new();
        assert_eq!(row.get(&Field::Inventory), FieldValue::Number(0.0));
        assert_eq!(row.get(&Field::Brand), FieldValue::Text(String::new()));
        assert_eq!(row.get(&Field::Custom("shelf".into())), FieldValue::Empty);
        assert_eq!(row.number(&Field::Inventory), 0.0);
    }

    #[test]
    fn test_null_falls_through_to_next_synonym() {
        let row = ProductRow::new()
            .with("doiTotal", Value::Null)
            .with("daysOfInventory", 7);
        assert_eq!(row.number(&Field::DaysOfInventory), 7.0);
    }

    #[test]
    fn test_key_falls_back_to_original_index() {
        let mut row = ProductRow::new().with("brand", "Acme");
        row.original_index = Some(4);
        assert_eq!(row.key(), "#4");

        let row = ProductRow::new().with("id", 1001);
        assert_eq!(row.key(), "1001");
    }

    #[test]
    fn test_packaging_text_fallback() {
        let row = ProductRow::new().with("product", "Indoor Plant Food 8oz");
        assert_eq!(row.packaging_text(), "Indoor Plant Food 8oz");
        let row = row.with("size", "1 Gallon");
        assert_eq!(row.packaging_text(), "1 Gallon");
    }

    #[test]
    fn test_deserialize_with_original_index() {
        let row: ProductRow =
            serde_json::from_value(json!({"id": "A", "_originalIndex": 5, "size": "8oz"})).unwrap();
        assert_eq!(row.original_index, Some(5));
        assert!(!row.fields.contains_key("_originalIndex"));
        assert_eq!(row.key(), "A");
    }
}
