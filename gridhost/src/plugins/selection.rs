use std::fmt;
use std::sync::Arc;

use gridcore::{RowId, SelectionChange, set_rows_selection};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::state::Controllable;

use super::{Reducer, names, with_state};

/// Owns the `selection` field: selected row ids in selection order.
#[derive(Clone)]
pub struct SelectionState {
    selection: Controllable<Vec<RowId>>,
    reducer: Reducer<Vec<RowId>, SelectionChange>,
}

impl SelectionState {
    pub const NAME: &'static str = "SelectionState";

    pub fn new() -> Self {
        Self {
            selection: Controllable::new(),
            reducer: Arc::new(|selection: &Vec<RowId>, change: &SelectionChange| {
                set_rows_selection(selection, change)
            }),
        }
    }

    pub fn selection(mut self, selection: impl Into<Arc<Vec<RowId>>>) -> Self {
        self.selection = self.selection.value(selection);
        self
    }

    pub fn default_selection(mut self, selection: impl Into<Arc<Vec<RowId>>>) -> Self {
        self.selection = self.selection.default_value(selection);
        self
    }

    pub fn on_selection_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Vec<RowId>>) + Send + Sync + 'static,
    {
        self.selection = self.selection.on_change(callback);
        self
    }

    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Vec<RowId>, &SelectionChange) -> Vec<RowId> + Send + Sync + 'static,
    {
        self.reducer = Arc::new(reducer);
        self
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl Plugin for SelectionState {
    fn definition(&self) -> PluginDefinition {
        with_state(
            PluginDefinition::new(Self::NAME),
            names::SELECTION,
            names::TOGGLE_SELECTION,
            &self.selection,
            Arc::clone(&self.reducer),
        )
    }
}

fn default_definition() -> PluginDefinition {
    SelectionState::new().definition()
}

inventory::submit! {
    PluginRegistration::new(SelectionState::NAME, default_definition)
}
