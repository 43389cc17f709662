use std::fmt;
use std::sync::Arc;

use gridcore::{ColumnFilterChange, Filter, set_column_filter};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::state::Controllable;

use super::{Reducer, names, with_state};

/// Owns the `filters` field.
///
/// Action `setColumnFilter` takes a [`ColumnFilterChange`].
#[derive(Clone)]
pub struct FilteringState {
    filters: Controllable<Vec<Filter>>,
    reducer: Reducer<Vec<Filter>, ColumnFilterChange>,
}

impl FilteringState {
    pub const NAME: &'static str = "FilteringState";

    pub fn new() -> Self {
        Self {
            filters: Controllable::new(),
            reducer: Arc::new(|filters: &Vec<Filter>, change: &ColumnFilterChange| {
                set_column_filter(filters, change)
            }),
        }
    }

    /// Control the filters from outside.
    pub fn filters(mut self, filters: impl Into<Arc<Vec<Filter>>>) -> Self {
        self.filters = self.filters.value(filters);
        self
    }

    pub fn default_filters(mut self, filters: impl Into<Arc<Vec<Filter>>>) -> Self {
        self.filters = self.filters.default_value(filters);
        self
    }

    pub fn on_filters_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Vec<Filter>>) + Send + Sync + 'static,
    {
        self.filters = self.filters.on_change(callback);
        self
    }

    /// Replace the `setColumnFilter` transformation.
    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Vec<Filter>, &ColumnFilterChange) -> Vec<Filter> + Send + Sync + 'static,
    {
        self.reducer = Arc::new(reducer);
        self
    }
}

impl Default for FilteringState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilteringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringState")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl Plugin for FilteringState {
    fn definition(&self) -> PluginDefinition {
        with_state(
            PluginDefinition::new(Self::NAME),
            names::FILTERS,
            names::SET_COLUMN_FILTER,
            &self.filters,
            Arc::clone(&self.reducer),
        )
    }
}

fn default_definition() -> PluginDefinition {
    FilteringState::new().definition()
}

inventory::submit! {
    PluginRegistration::new(FilteringState::NAME, default_definition)
}
