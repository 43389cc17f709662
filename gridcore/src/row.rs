//! Row and column data shared by every transformation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable identifier of a data row.
pub type RowId = u64;

/// A data row: an id plus named cell values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub cells: BTreeMap<String, String>,
}

impl Row {
    /// Create an empty row with the given id.
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    /// Set a cell value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Get a cell value by column name.
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// A grid column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub title: String,
}

impl Column {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}
