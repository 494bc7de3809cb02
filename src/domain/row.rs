//! Table row model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One warehouse row, as column name to value
///
/// Columns without a value are left out rather than sent as `null`, so the
/// warehouse keeps its column defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Column values keyed by column name
    pub values: BTreeMap<String, Value>,
}

impl TableRow {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Sets a column only when a value is present
    pub fn set_opt<V: Into<Value>>(&mut self, column: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.set(column, value);
        }
    }

    /// Gets a column value
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Number of populated columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no populated columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
