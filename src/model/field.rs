//! Tolerant-schema field access for product rows.
//!
//! Upstream feeds disagree on field names (`doiTotal` vs `daysOfInventory`,
//! `sales7Day` vs `sales_7_day`, ...). Every canonical [`Field`] carries a
//! fixed synonym list that is tried in order; the first non-null value wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical row field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Field {
    Id,
    Brand,
    Product,
    Size,
    /// Days of inventory at trailing sales velocity
    DaysOfInventory,
    /// Total units on hand
    Inventory,
    Sales7Day,
    Sales30Day,
    Sales90Day,
    /// Suggested units to make, supplied by the caller
    SuggestedQty,
    LabelLocation,
    /// Any other column, read by exact key
    Custom(String),
}

impl Field {
    /// All canonical (non-custom) fields.
    pub const CANONICAL: &'static [Self] = &[
        Self::Id,
        Self::Brand,
        Self::Product,
        Self::Size,
        Self::DaysOfInventory,
        Self::Inventory,
        Self::Sales7Day,
        Self::Sales30Day,
        Self::Sales90Day,
        Self::SuggestedQty,
        Self::LabelLocation,
    ];

    /// Canonical name used in filter specs, sort specs and reports.
    pub fn name(&self) -> &str {
        match self {
            Self::Id => "id",
            Self::Brand => "brand",
            Self::Product => "product",
            Self::Size => "size",
            Self::DaysOfInventory => "doi",
            Self::Inventory => "inventory",
            Self::Sales7Day => "sales7",
            Self::Sales30Day => "sales30",
            Self::Sales90Day => "sales90",
            Self::SuggestedQty => "suggested",
            Self::LabelLocation => "labelLocation",
            Self::Custom(name) => name,
        }
    }

    /// Raw record keys tried, in order, when reading this field.
    pub fn synonyms(&self) -> &[&str] {
        match self {
            Self::Id => &["id", "productId", "product_id", "sku"],
            Self::Brand => &["brand", "brandName", "brand_name"],
            Self::Product => &["product", "productName", "product_name", "name"],
            Self::Size => &["size", "sizeLabel", "size_label", "label"],
            Self::DaysOfInventory => &["doiTotal", "daysOfInventory", "days_of_inventory", "doi"],
            Self::Inventory => &[
                "totalInventory",
                "inventoryTotal",
                "total_inventory",
                "inventory",
                "stock",
            ],
            Self::Sales7Day => &["sales7Day", "sales_7_day", "sales7d"],
            Self::Sales30Day => &["sales30Day", "sales_30_day", "sales30d"],
            Self::Sales90Day => &["sales90Day", "sales_90_day", "sales90d"],
            Self::SuggestedQty => &["suggestedQty", "suggested_qty", "unitsNeeded", "units_needed"],
            Self::LabelLocation => &["labelLocation", "label_location"],
            Self::Custom(_) => &[],
        }
    }

    /// Whether values of this field compare numerically.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::DaysOfInventory
                | Self::Inventory
                | Self::Sales7Day
                | Self::Sales30Day
                | Self::Sales90Day
                | Self::SuggestedQty
        )
    }

    /// Resolve a user-supplied column name to a field.
    ///
    /// Canonical names match case-insensitively; raw synonyms match exactly.
    /// Anything else becomes [`Field::Custom`].
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        Self::CANONICAL
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(trimmed) || f.synonyms().contains(&trimmed))
            .cloned()
            .unwrap_or_else(|| Self::Custom(trimmed.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Field> for String {
    fn from(f: Field) -> Self {
        f.name().to_string()
    }
}

/// A table column: either a row field or the synthetic "added to shipment" column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Column {
    Field(Field),
    /// Resolves to `Added` / `Not Added` from the selection's checked set
    Added,
}

impl Column {
    pub const ADDED_LABEL: &'static str = "Added";
    pub const NOT_ADDED_LABEL: &'static str = "Not Added";

    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("added") {
            Self::Added
        } else {
            Self::Field(Field::parse(name))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Field(field) => field.name(),
            Self::Added => "added",
        }
    }

    pub const fn is_numeric(&self) -> bool {
        match self {
            Self::Field(field) => field.is_numeric(),
            Self::Added => false,
        }
    }
}

impl From<Field> for Column {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Column {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Column> for String {
    fn from(c: Column) -> Self {
        c.name().to_string()
    }
}

/// A resolved cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Empty,
}

impl FieldValue {
    /// Numeric view of the value; anything unparsable reads as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_number(s).unwrap_or(0.0),
            Self::Empty => 0.0,
        }
    }

    /// String form used for value-set membership and text operators.
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
            Self::Empty => true,
        }
    }
}

/// Parse a loosely formatted number (`"1,200"`, `" 42 "`, `"3.5"`).
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number without a trailing `.0` for whole values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
