//! Expanded detail rows.

use serde::{Deserialize, Serialize};

use crate::row::RowId;

/// Payload of the `setDetailRowExpanded` command.
///
/// `expanded: None` toggles the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRowChange {
    pub row_id: RowId,
    pub expanded: Option<bool>,
}

impl DetailRowChange {
    pub fn toggle(row_id: RowId) -> Self {
        Self {
            row_id,
            expanded: None,
        }
    }

    pub fn expand(row_id: RowId, expanded: bool) -> Self {
        Self {
            row_id,
            expanded: Some(expanded),
        }
    }
}

/// Expand, collapse or toggle one detail row.
pub fn set_detail_row_expanded(expanded_rows: &[RowId], change: &DetailRowChange) -> Vec<RowId> {
    let index = expanded_rows.iter().position(|id| *id == change.row_id);
    let expand = change.expanded.unwrap_or(index.is_none());
    let mut next = expanded_rows.to_vec();

    match (index, expand) {
        (Some(index), false) => {
            next.remove(index);
        }
        (None, true) => next.push(change.row_id),
        _ => {}
    }

    next
}

pub fn is_detail_row_expanded(expanded_rows: &[RowId], row_id: RowId) -> bool {
    expanded_rows.contains(&row_id)
}
