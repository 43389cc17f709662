//! Row selection.

use serde::{Deserialize, Serialize};

use crate::row::RowId;

/// Payload of the `toggleSelection` command.
///
/// With `selected: None` the rows are toggled as a group: if any of them is
/// unselected they all become selected, otherwise they all become unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub row_ids: Vec<RowId>,
    pub selected: Option<bool>,
}

impl SelectionChange {
    pub fn toggle(row_ids: impl Into<Vec<RowId>>) -> Self {
        Self {
            row_ids: row_ids.into(),
            selected: None,
        }
    }

    pub fn select(row_ids: impl Into<Vec<RowId>>, selected: bool) -> Self {
        Self {
            row_ids: row_ids.into(),
            selected: Some(selected),
        }
    }
}

/// Select or deselect a set of rows, preserving selection order.
pub fn set_rows_selection(selection: &[RowId], change: &SelectionChange) -> Vec<RowId> {
    let select = change.selected.unwrap_or_else(|| {
        !change
            .row_ids
            .iter()
            .all(|id| selection.contains(id))
    });

    if select {
        let mut next = selection.to_vec();
        for id in &change.row_ids {
            if !next.contains(id) {
                next.push(*id);
            }
        }
        next
    } else {
        selection
            .iter()
            .copied()
            .filter(|id| !change.row_ids.contains(id))
            .collect()
    }
}
