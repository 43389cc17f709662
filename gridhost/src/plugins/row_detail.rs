use std::fmt;
use std::sync::Arc;

use gridcore::{DetailRowChange, RowId, set_detail_row_expanded};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::state::Controllable;

use super::{Reducer, names, with_state};

/// Owns the `expandedRows` field: ids of rows whose detail is shown.
#[derive(Clone)]
pub struct RowDetailState {
    expanded_rows: Controllable<Vec<RowId>>,
    reducer: Reducer<Vec<RowId>, DetailRowChange>,
}

impl RowDetailState {
    pub const NAME: &'static str = "RowDetailState";

    pub fn new() -> Self {
        Self {
            expanded_rows: Controllable::new(),
            reducer: Arc::new(|expanded: &Vec<RowId>, change: &DetailRowChange| {
                set_detail_row_expanded(expanded, change)
            }),
        }
    }

    pub fn expanded_rows(mut self, rows: impl Into<Arc<Vec<RowId>>>) -> Self {
        self.expanded_rows = self.expanded_rows.value(rows);
        self
    }

    pub fn default_expanded_rows(mut self, rows: impl Into<Arc<Vec<RowId>>>) -> Self {
        self.expanded_rows = self.expanded_rows.default_value(rows);
        self
    }

    pub fn on_expanded_rows_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Vec<RowId>>) + Send + Sync + 'static,
    {
        self.expanded_rows = self.expanded_rows.on_change(callback);
        self
    }

    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Vec<RowId>, &DetailRowChange) -> Vec<RowId> + Send + Sync + 'static,
    {
        self.reducer = Arc::new(reducer);
        self
    }
}

impl Default for RowDetailState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RowDetailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowDetailState")
            .field("expanded_rows", &self.expanded_rows)
            .finish_non_exhaustive()
    }
}

impl Plugin for RowDetailState {
    fn definition(&self) -> PluginDefinition {
        with_state(
            PluginDefinition::new(Self::NAME),
            names::EXPANDED_ROWS,
            names::SET_DETAIL_ROW_EXPANDED,
            &self.expanded_rows,
            Arc::clone(&self.reducer),
        )
    }
}

fn default_definition() -> PluginDefinition {
    RowDetailState::new().definition()
}

inventory::submit! {
    PluginRegistration::new(RowDetailState::NAME, default_definition)
}
