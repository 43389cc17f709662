use std::fmt;
use std::sync::Arc;

use gridcore::{Sorting, SortingChange, change_column_sorting};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::state::Controllable;

use super::{Reducer, names, with_state};

/// Owns the `sorting` field.
#[derive(Clone)]
pub struct SortingState {
    sorting: Controllable<Vec<Sorting>>,
    reducer: Reducer<Vec<Sorting>, SortingChange>,
}

impl SortingState {
    pub const NAME: &'static str = "SortingState";

    pub fn new() -> Self {
        Self {
            sorting: Controllable::new(),
            reducer: Arc::new(|sorting: &Vec<Sorting>, change: &SortingChange| {
                change_column_sorting(sorting, change)
            }),
        }
    }

    pub fn sorting(mut self, sorting: impl Into<Arc<Vec<Sorting>>>) -> Self {
        self.sorting = self.sorting.value(sorting);
        self
    }

    pub fn default_sorting(mut self, sorting: impl Into<Arc<Vec<Sorting>>>) -> Self {
        self.sorting = self.sorting.default_value(sorting);
        self
    }

    pub fn on_sorting_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Vec<Sorting>>) + Send + Sync + 'static,
    {
        self.sorting = self.sorting.on_change(callback);
        self
    }

    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Vec<Sorting>, &SortingChange) -> Vec<Sorting> + Send + Sync + 'static,
    {
        self.reducer = Arc::new(reducer);
        self
    }
}

impl Default for SortingState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SortingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortingState")
            .field("sorting", &self.sorting)
            .finish_non_exhaustive()
    }
}

impl Plugin for SortingState {
    fn definition(&self) -> PluginDefinition {
        with_state(
            PluginDefinition::new(Self::NAME),
            names::SORTING,
            names::CHANGE_COLUMN_SORTING,
            &self.sorting,
            Arc::clone(&self.reducer),
        )
    }
}

fn default_definition() -> PluginDefinition {
    SortingState::new().definition()
}

inventory::submit! {
    PluginRegistration::new(SortingState::NAME, default_definition)
}
