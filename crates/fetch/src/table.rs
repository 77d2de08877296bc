//! Uniform tabular shape for exchange feed responses.
//!
//! The exchanges return loosely-structured JSON: either a flat object with
//! `fields`/`data` keys, or a `tables` array of such objects where the right
//! one must be located. Everything is normalized into [`RawTable`] here so
//! downstream code never touches raw JSON.

use flowrank_core::{Error, Result};
use serde_json::Value;

/// A parsed feed: column labels plus rows of cell text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header row: one label per column.
    pub fields: Vec<String>,
    /// Data rows; each cell coerced to a trimmed string.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// An empty table, used when a feed is unusable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the table carries no usable data.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() || self.rows.is_empty()
    }

    /// Parse a `{fields: [...], data: [[...]]}` object.
    fn from_object(value: &Value) -> Result<Self> {
        let fields = value
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::fetch("payload is missing 'fields'".to_string()))?
            .iter()
            .map(cell_to_string)
            .collect();

        let rows = value
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::fetch("payload is missing 'data'".to_string()))?
            .iter()
            .filter_map(Value::as_array)
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(Self { fields, rows })
    }
}

/// Where to find the table inside a feed's response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLocator {
    /// The body itself is a flat `{fields, data}` object.
    Flat,
    /// The body has a `tables` array; pick the entry whose title contains
    /// the given text.
    TitleContains(&'static str),
    /// The body has a `tables` array; take the first entry.
    First,
}

impl TableLocator {
    /// Extract the table this locator points at.
    pub fn extract(self, body: &Value) -> Result<RawTable> {
        match self {
            TableLocator::Flat => RawTable::from_object(body),
            TableLocator::TitleContains(fragment) => {
                let tables = named_tables(body)?;
                let table = tables
                    .iter()
                    .find(|t| {
                        t.get("title")
                            .and_then(Value::as_str)
                            .is_some_and(|title| title.contains(fragment))
                    })
                    .ok_or_else(|| {
                        Error::fetch(format!("no table with title containing '{}'", fragment))
                    })?;
                RawTable::from_object(table)
            }
            TableLocator::First => {
                let tables = named_tables(body)?;
                let table = tables
                    .first()
                    .ok_or_else(|| Error::fetch("'tables' is empty".to_string()))?;
                RawTable::from_object(table)
            }
        }
    }
}

fn named_tables(body: &Value) -> Result<&Vec<Value>> {
    body.get("tables")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::fetch("payload is missing 'tables'".to_string()))
}

/// Coerce a JSON cell to trimmed text. TPEx mixes strings and bare numbers
/// in the same table.
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
