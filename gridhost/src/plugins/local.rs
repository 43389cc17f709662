use gridcore::{Filter, Row, filtered_rows, paginated_rows};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::value::Value;

use super::{FilteringState, PagingState, names};

/// Narrows the rows below it to those matching the current `filters`.
///
/// With no filters the rows below pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiltering;

impl LocalFiltering {
    pub const NAME: &'static str = "LocalFiltering";
}

impl Plugin for LocalFiltering {
    fn definition(&self) -> PluginDefinition {
        PluginDefinition::new(Self::NAME)
            .depends_on(FilteringState::NAME)
            .chained_getter(names::ROWS, &[names::FILTERS], |cx| {
                let filters = cx.require_as::<Vec<Filter>>(names::FILTERS)?;
                let previous = cx.require_previous()?;
                if filters.is_empty() {
                    return Ok(previous.clone());
                }
                let rows = previous.expect::<Vec<Row>>(names::ROWS)?;
                Ok(Value::new(filtered_rows(rows, filters)))
            })
    }
}

/// Cuts the rows below it down to the current page.
///
/// A page size of 0 passes every row through.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPaging;

impl LocalPaging {
    pub const NAME: &'static str = "LocalPaging";
}

impl Plugin for LocalPaging {
    fn definition(&self) -> PluginDefinition {
        PluginDefinition::new(Self::NAME)
            .depends_on(PagingState::NAME)
            .chained_getter(
                names::ROWS,
                &[names::CURRENT_PAGE, names::PAGE_SIZE],
                |cx| {
                    let current_page = *cx.require_as::<usize>(names::CURRENT_PAGE)?;
                    let page_size = *cx.require_as::<usize>(names::PAGE_SIZE)?;
                    let previous = cx.require_previous()?;
                    if page_size == 0 {
                        return Ok(previous.clone());
                    }
                    let rows = previous.expect::<Vec<Row>>(names::ROWS)?;
                    Ok(Value::new(paginated_rows(rows, page_size, current_page)))
                },
            )
    }
}

fn filtering_definition() -> PluginDefinition {
    LocalFiltering.definition()
}

fn paging_definition() -> PluginDefinition {
    LocalPaging.definition()
}

inventory::submit! {
    PluginRegistration::new(LocalFiltering::NAME, filtering_definition)
}

inventory::submit! {
    PluginRegistration::new(LocalPaging::NAME, paging_definition)
}
