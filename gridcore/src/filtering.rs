//! Column filters.

use serde::{Deserialize, Serialize};

use crate::row::Row;

/// A filter applied to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub column_name: String,
    pub value: String,
}

impl Filter {
    pub fn new(column_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            value: value.into(),
        }
    }
}

/// Payload of the `setColumnFilter` command.
///
/// `value: None` clears the filter of the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilterChange {
    pub column_name: String,
    pub value: Option<String>,
}

impl ColumnFilterChange {
    /// Set (or replace) the filter of a column.
    pub fn set(column_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            value: Some(value.into()),
        }
    }

    /// Remove the filter of a column.
    pub fn clear(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            value: None,
        }
    }
}

/// Set, replace or remove the filter of one column.
///
/// A replaced filter keeps its position; a new one is appended.
pub fn set_column_filter(filters: &[Filter], change: &ColumnFilterChange) -> Vec<Filter> {
    let index = filters
        .iter()
        .position(|f| f.column_name == change.column_name);
    let mut next = filters.to_vec();

    match (&change.value, index) {
        (Some(value), Some(index)) => {
            next[index] = Filter::new(change.column_name.clone(), value.clone());
        }
        (Some(value), None) => next.push(Filter::new(change.column_name.clone(), value.clone())),
        (None, Some(index)) => {
            next.remove(index);
        }
        (None, None) => {}
    }

    next
}

/// Keep the rows whose cells contain every filter value (case-insensitive).
///
/// A row missing a filtered column never matches that filter.
pub fn filtered_rows(rows: &[Row], filters: &[Filter]) -> Vec<Row> {
    if filters.is_empty() {
        return rows.to_vec();
    }

    let needles: Vec<(&str, String)> = filters
        .iter()
        .map(|f| (f.column_name.as_str(), f.value.to_lowercase()))
        .collect();

    rows.iter()
        .filter(|row| {
            needles.iter().all(|(column, needle)| {
                row.cell(column)
                    .is_some_and(|value| value.to_lowercase().contains(needle.as_str()))
            })
        })
        .cloned()
        .collect()
}
