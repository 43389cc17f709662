//! Stock grid plugins.
//!
//! State plugins own one or more fields, expose each as a getter of the same
//! name and change them through an action backed by a `gridcore` reducer.
//! Every reducer can be swapped out through the plugin's builder.
//!
//! The local plugins contribute chained `rows` getters that transform
//! whatever rows lie below them in the stack.

mod filtering;
mod grid;
mod grouping;
mod local;
mod paging;
mod row_detail;
mod selection;
mod sorting;

use std::any::Any;
use std::sync::Arc;

pub use filtering::FilteringState;
pub use grid::GridCore;
pub use grouping::GroupingState;
pub use local::{LocalFiltering, LocalPaging};
pub use paging::PagingState;
pub use row_detail::RowDetailState;
pub use selection::SelectionState;
pub use sorting::SortingState;

use crate::dispatch::ActionContext;
use crate::error::Result;
use crate::plugin::PluginDefinition;
use crate::resolve::GetterContext;
use crate::state::Controllable;
use crate::value::Value;

/// Getter, field and action names used by the stock plugins.
pub mod names {
    pub const ROWS: &str = "rows";
    pub const COLUMNS: &str = "columns";

    pub const FILTERS: &str = "filters";
    pub const SET_COLUMN_FILTER: &str = "setColumnFilter";

    pub const SELECTION: &str = "selection";
    pub const TOGGLE_SELECTION: &str = "toggleSelection";

    pub const EXPANDED_ROWS: &str = "expandedRows";
    pub const SET_DETAIL_ROW_EXPANDED: &str = "setDetailRowExpanded";

    pub const CURRENT_PAGE: &str = "currentPage";
    pub const SET_CURRENT_PAGE: &str = "setCurrentPage";
    pub const PAGE_SIZE: &str = "pageSize";
    pub const SET_PAGE_SIZE: &str = "setPageSize";

    pub const SORTING: &str = "sorting";
    pub const CHANGE_COLUMN_SORTING: &str = "changeColumnSorting";

    pub const GROUPING: &str = "grouping";
    pub const CHANGE_COLUMN_GROUPING: &str = "changeColumnGrouping";
    pub const EXPANDED_GROUPS: &str = "expandedGroups";
    pub const TOGGLE_GROUP_EXPANDED: &str = "toggleGroupExpanded";
}

/// A transformation from the previous field value and a payload to the next
/// field value.
pub type Reducer<T, P> = Arc<dyn Fn(&T, &P) -> T + Send + Sync>;

/// Add a field, its getter and the action that reduces it.
///
/// Stock fields compare by value, so a reducer that returns an equal value
/// never fires the change callback.
fn with_state<T, P>(
    definition: PluginDefinition,
    field: &'static str,
    action: &str,
    props: &Controllable<T>,
    reducer: Reducer<T, P>,
) -> PluginDefinition
where
    T: Default + PartialEq + Any + Send + Sync,
    P: Any,
{
    definition
        .field(props.bind(field).compare_by_value::<T>())
        .getter(field, &[], field_getter(field))
        .action(action, reducer_action(field, reducer))
}

fn field_getter(
    field: &'static str,
) -> impl Fn(&GetterContext<'_>) -> Result<Value> + Send + Sync + 'static {
    move |cx: &GetterContext<'_>| cx.field(field).cloned()
}

fn reducer_action<T, P>(
    field: &'static str,
    reducer: Reducer<T, P>,
) -> impl Fn(&mut ActionContext<'_>, &Value) -> Result<()> + Send + Sync + 'static
where
    T: Any + Send + Sync,
    P: Any,
{
    move |cx: &mut ActionContext<'_>, payload: &Value| {
        cx.apply_typed_reducer::<T, P, _>(field, payload, |previous, payload| {
            reducer(previous, payload)
        })?;
        Ok(())
    }
}
