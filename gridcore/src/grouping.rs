//! Column grouping and expanded groups.

use serde::{Deserialize, Serialize};

/// Grouping by one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub column_name: String,
}

impl Grouping {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
        }
    }
}

/// Payload of the `changeColumnGrouping` command.
///
/// An ungrouped column is inserted at `group_index` (or appended). A grouped
/// column is moved to `group_index`, or ungrouped when `group_index` is `None`
/// or equals its current position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingChange {
    pub column_name: String,
    pub group_index: Option<usize>,
}

impl GroupingChange {
    pub fn toggle(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            group_index: None,
        }
    }

    pub fn at(column_name: impl Into<String>, group_index: usize) -> Self {
        Self {
            column_name: column_name.into(),
            group_index: Some(group_index),
        }
    }
}

pub fn change_column_grouping(grouping: &[Grouping], change: &GroupingChange) -> Vec<Grouping> {
    let index = grouping
        .iter()
        .position(|g| g.column_name == change.column_name);
    let mut next = grouping.to_vec();

    match (index, change.group_index) {
        (None, target) => {
            let target = target.unwrap_or(next.len()).min(next.len());
            next.insert(target, Grouping::new(change.column_name.clone()));
        }
        (Some(index), None) => {
            next.remove(index);
        }
        (Some(index), Some(target)) if target == index => {
            next.remove(index);
        }
        (Some(index), Some(target)) => {
            let moved = next.remove(index);
            next.insert(target.min(next.len()), moved);
        }
    }

    next
}

/// Toggle the expansion of one group, identified by its compound key.
pub fn toggle_expanded_group(expanded_groups: &[String], group_key: &str) -> Vec<String> {
    match expanded_groups.iter().position(|key| key == group_key) {
        Some(index) => {
            let mut next = expanded_groups.to_vec();
            next.remove(index);
            next
        }
        None => {
            let mut next = expanded_groups.to_vec();
            next.push(group_key.to_string());
            next
        }
    }
}
