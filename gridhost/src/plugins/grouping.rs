use std::fmt;
use std::sync::Arc;

use gridcore::{Grouping, GroupingChange, change_column_grouping, toggle_expanded_group};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::state::Controllable;

use super::{Reducer, names, with_state};

/// Owns the `grouping` field and the `expandedGroups` field.
///
/// `toggleGroupExpanded` takes the compound group key as a `String`.
#[derive(Clone)]
pub struct GroupingState {
    grouping: Controllable<Vec<Grouping>>,
    expanded_groups: Controllable<Vec<String>>,
    grouping_reducer: Reducer<Vec<Grouping>, GroupingChange>,
    expanded_groups_reducer: Reducer<Vec<String>, String>,
}

impl GroupingState {
    pub const NAME: &'static str = "GroupingState";

    pub fn new() -> Self {
        Self {
            grouping: Controllable::new(),
            expanded_groups: Controllable::new(),
            grouping_reducer: Arc::new(|grouping: &Vec<Grouping>, change: &GroupingChange| {
                change_column_grouping(grouping, change)
            }),
            expanded_groups_reducer: Arc::new(|expanded: &Vec<String>, key: &String| {
                toggle_expanded_group(expanded, key)
            }),
        }
    }

    pub fn grouping(mut self, grouping: impl Into<Arc<Vec<Grouping>>>) -> Self {
        self.grouping = self.grouping.value(grouping);
        self
    }

    pub fn default_grouping(mut self, grouping: impl Into<Arc<Vec<Grouping>>>) -> Self {
        self.grouping = self.grouping.default_value(grouping);
        self
    }

    pub fn on_grouping_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Vec<Grouping>>) + Send + Sync + 'static,
    {
        self.grouping = self.grouping.on_change(callback);
        self
    }

    pub fn expanded_groups(mut self, groups: impl Into<Arc<Vec<String>>>) -> Self {
        self.expanded_groups = self.expanded_groups.value(groups);
        self
    }

    pub fn default_expanded_groups(mut self, groups: impl Into<Arc<Vec<String>>>) -> Self {
        self.expanded_groups = self.expanded_groups.default_value(groups);
        self
    }

    pub fn on_expanded_groups_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Vec<String>>) + Send + Sync + 'static,
    {
        self.expanded_groups = self.expanded_groups.on_change(callback);
        self
    }

    pub fn grouping_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Vec<Grouping>, &GroupingChange) -> Vec<Grouping> + Send + Sync + 'static,
    {
        self.grouping_reducer = Arc::new(reducer);
        self
    }

    pub fn expanded_groups_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Vec<String>, &String) -> Vec<String> + Send + Sync + 'static,
    {
        self.expanded_groups_reducer = Arc::new(reducer);
        self
    }
}

impl Default for GroupingState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GroupingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupingState")
            .field("grouping", &self.grouping)
            .field("expanded_groups", &self.expanded_groups)
            .finish_non_exhaustive()
    }
}

impl Plugin for GroupingState {
    fn definition(&self) -> PluginDefinition {
        let definition = with_state(
            PluginDefinition::new(Self::NAME),
            names::GROUPING,
            names::CHANGE_COLUMN_GROUPING,
            &self.grouping,
            Arc::clone(&self.grouping_reducer),
        );
        with_state(
            definition,
            names::EXPANDED_GROUPS,
            names::TOGGLE_GROUP_EXPANDED,
            &self.expanded_groups,
            Arc::clone(&self.expanded_groups_reducer),
        )
    }
}

fn default_definition() -> PluginDefinition {
    GroupingState::new().definition()
}

inventory::submit! {
    PluginRegistration::new(GroupingState::NAME, default_definition)
}
