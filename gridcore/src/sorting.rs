//! Column sorting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sorting applied to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    pub column_name: String,
    pub direction: SortDirection,
}

impl Sorting {
    pub fn new(column_name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_name: column_name.into(),
            direction,
        }
    }
}

/// Which of the other sorted columns survive a sorting change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepOther {
    /// Sort by the changed column only.
    #[default]
    None,
    /// Keep every other sorted column.
    All,
    /// Keep only the listed columns.
    Columns(Vec<String>),
}

/// Payload of the `changeColumnSorting` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingChange {
    pub column_name: String,
    /// Explicit direction. `None` cycles asc -> desc -> asc.
    pub direction: Option<SortDirection>,
    /// Remove the column from the sorting instead of setting it.
    pub cancel: bool,
    pub keep_other: KeepOther,
    /// Position of the column in the resulting sorting.
    pub sort_index: Option<usize>,
}

impl SortingChange {
    pub fn toggle(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            ..Default::default()
        }
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn cancel(mut self) -> Self {
        self.cancel = true;
        self
    }

    pub fn keep_other(mut self, keep_other: KeepOther) -> Self {
        self.keep_other = keep_other;
        self
    }

    pub fn sort_index(mut self, index: usize) -> Self {
        self.sort_index = Some(index);
        self
    }
}

pub fn change_column_sorting(sorting: &[Sorting], change: &SortingChange) -> Vec<Sorting> {
    let existing_index = sorting
        .iter()
        .position(|s| s.column_name == change.column_name);

    let mut next: Vec<Sorting> = match &change.keep_other {
        KeepOther::None => Vec::new(),
        KeepOther::All => sorting.to_vec(),
        KeepOther::Columns(columns) => sorting
            .iter()
            .filter(|s| columns.contains(&s.column_name))
            .cloned()
            .collect(),
    };
    let kept_index = next
        .iter()
        .position(|s| s.column_name == change.column_name);
    if let Some(index) = kept_index {
        next.remove(index);
    }

    if change.cancel {
        return next;
    }

    let direction = change.direction.unwrap_or_else(|| {
        existing_index
            .map(|i| sorting[i].direction.reversed())
            .unwrap_or_default()
    });
    let index = change
        .sort_index
        .or(kept_index)
        .unwrap_or(next.len())
        .min(next.len());
    next.insert(index, Sorting::new(change.column_name.clone(), direction));

    next
}
