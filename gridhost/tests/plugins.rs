//! Tests for the stock grid plugins.

use std::sync::{Arc, Mutex};

use gridcore::{
    ColumnFilterChange, DetailRowChange, Filter, Grouping, GroupingChange, Row, RowId,
    SelectionChange, SortDirection, Sorting, SortingChange,
};
use gridhost::plugins::names;
use gridhost::prelude::*;
use gridhost::registered_plugins;

fn sample_rows() -> Vec<Row> {
    vec![
        Row::new(1).with("city", "Paris").with("name", "Ada"),
        Row::new(2).with("city", "Berlin").with("name", "Alan"),
        Row::new(3).with("city", "Parma").with("name", "Grace"),
        Row::new(4).with("city", "Oslo").with("name", "Edsger"),
        Row::new(5).with("city", "Paris").with("name", "Barbara"),
    ]
}

fn row_ids(host: &mut PluginHost) -> Vec<RowId> {
    host.resolve_as::<Vec<Row>>(names::ROWS)
        .unwrap()
        .unwrap()
        .iter()
        .map(|row| row.id)
        .collect()
}

// ============================================================================
// FilteringState
// ============================================================================

type FilterCalls = Arc<Mutex<Vec<(Vec<Filter>, ColumnFilterChange)>>>;

/// A filtering plugin whose transformation returns `results` in order and
/// records what it was called with.
fn scripted_filtering(results: Vec<Vec<Filter>>, calls: FilterCalls) -> FilteringState {
    let results = Mutex::new(results.into_iter());
    FilteringState::new().reducer(move |filters: &Vec<Filter>, change: &ColumnFilterChange| {
        calls.lock().unwrap().push((filters.clone(), change.clone()));
        results.lock().unwrap().next().unwrap()
    })
}

#[test]
fn test_filtering_state_applies_transformation() {
    let calls = FilterCalls::default();
    let notified: Arc<Mutex<Vec<Vec<Filter>>>> = Arc::default();
    let sink = Arc::clone(&notified);
    let transformed = vec![Filter::new("b", "a")];

    let plugin = scripted_filtering(vec![transformed.clone()], Arc::clone(&calls))
        .default_filters(vec![Filter::new("a", "a")])
        .on_filters_change(move |filters| sink.lock().unwrap().push((**filters).clone()));

    let mut host = PluginHost::default();
    host.mount(&plugin).unwrap();

    let payload = ColumnFilterChange::default();
    host.dispatch(names::SET_COLUMN_FILTER, Value::new(payload.clone()))
        .unwrap();

    let filters = host.resolve_as::<Vec<Filter>>(names::FILTERS).unwrap().unwrap();
    assert_eq!(*filters, transformed);
    assert_eq!(*notified.lock().unwrap(), vec![transformed]);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![(vec![Filter::new("a", "a")], payload)]
    );
}

#[test]
fn test_filtering_state_threads_transformations_in_batch() {
    let calls = FilterCalls::default();
    let notified: Arc<Mutex<Vec<Vec<Filter>>>> = Arc::default();
    let sink = Arc::clone(&notified);
    let first = vec![Filter::new("b", "a")];
    let second = vec![Filter::new("c", "a")];
    let default = vec![Filter::new("a", "a")];

    let plugin = scripted_filtering(vec![first.clone(), second.clone()], Arc::clone(&calls))
        .default_filters(default.clone())
        .on_filters_change(move |filters| sink.lock().unwrap().push((**filters).clone()));

    let mut host = PluginHost::default();
    host.mount(&plugin).unwrap();

    let payload = ColumnFilterChange::set("a", "x");
    host.batch(|tx| {
        tx.dispatch(names::SET_COLUMN_FILTER, Value::new(payload.clone()))?;
        tx.dispatch(names::SET_COLUMN_FILTER, Value::new(payload.clone()))
    })
    .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![(default, payload.clone()), (first, payload)]
    );
    assert_eq!(*notified.lock().unwrap(), vec![second]);
}

#[test]
fn test_controlled_filters() {
    let notified: Arc<Mutex<Vec<Vec<Filter>>>> = Arc::default();
    let sink = Arc::clone(&notified);
    let plugin = FilteringState::new()
        .filters(vec![Filter::new("city", "par")])
        .on_filters_change(move |filters| sink.lock().unwrap().push((**filters).clone()));

    let mut host = PluginHost::default();
    host.mount(&plugin).unwrap();
    host.dispatch(
        names::SET_COLUMN_FILTER,
        Value::new(ColumnFilterChange::set("name", "a")),
    )
    .unwrap();

    let filters = host.resolve_as::<Vec<Filter>>(names::FILTERS).unwrap().unwrap();
    assert_eq!(*filters, vec![Filter::new("city", "par")]);
    assert_eq!(
        *notified.lock().unwrap(),
        vec![vec![Filter::new("city", "par"), Filter::new("name", "a")]]
    );
}

// ============================================================================
// SelectionState and RowDetailState
// ============================================================================

#[test]
fn test_selection_state_toggles_rows() {
    let mut host = PluginHost::default();
    host.mount(&SelectionState::new().default_selection(vec![1])).unwrap();

    host.dispatch(
        names::TOGGLE_SELECTION,
        Value::new(SelectionChange::toggle(vec![1, 2])),
    )
    .unwrap();
    let selection = host.resolve_as::<Vec<RowId>>(names::SELECTION).unwrap().unwrap();
    assert_eq!(*selection, vec![1, 2]);

    host.dispatch(
        names::TOGGLE_SELECTION,
        Value::new(SelectionChange::toggle(vec![1, 2])),
    )
    .unwrap();
    let selection = host.resolve_as::<Vec<RowId>>(names::SELECTION).unwrap().unwrap();
    assert!(selection.is_empty());
}

#[test]
fn test_row_detail_state_notifies_once_per_batch() {
    let notified: Arc<Mutex<Vec<Vec<RowId>>>> = Arc::default();
    let sink = Arc::clone(&notified);
    let plugin = RowDetailState::new()
        .default_expanded_rows(vec![3])
        .on_expanded_rows_change(move |rows| sink.lock().unwrap().push((**rows).clone()));

    let mut host = PluginHost::default();
    host.mount(&plugin).unwrap();
    host.batch(|tx| {
        tx.dispatch(
            names::SET_DETAIL_ROW_EXPANDED,
            Value::new(DetailRowChange::toggle(1)),
        )?;
        tx.dispatch(
            names::SET_DETAIL_ROW_EXPANDED,
            Value::new(DetailRowChange::toggle(3)),
        )
    })
    .unwrap();

    assert_eq!(*notified.lock().unwrap(), vec![vec![1]]);
}

#[test]
fn test_row_detail_noop_change_is_silent() {
    let notified: Arc<Mutex<usize>> = Arc::default();
    let sink = Arc::clone(&notified);
    let plugin = RowDetailState::new()
        .default_expanded_rows(vec![3])
        .on_expanded_rows_change(move |_| *sink.lock().unwrap() += 1);

    let mut host = PluginHost::default();
    host.mount(&plugin).unwrap();
    let report = host
        .batch(|tx| {
            tx.dispatch(
                names::SET_DETAIL_ROW_EXPANDED,
                Value::new(DetailRowChange::expand(3, true)),
            )
        })
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(*notified.lock().unwrap(), 0);
}

// ============================================================================
// SortingState and GroupingState
// ============================================================================

#[test]
fn test_sorting_state() {
    let mut host = PluginHost::default();
    host.mount(&SortingState::new()).unwrap();

    host.dispatch(
        names::CHANGE_COLUMN_SORTING,
        Value::new(SortingChange::toggle("name")),
    )
    .unwrap();
    host.dispatch(
        names::CHANGE_COLUMN_SORTING,
        Value::new(SortingChange::toggle("name")),
    )
    .unwrap();

    let sorting = host.resolve_as::<Vec<Sorting>>(names::SORTING).unwrap().unwrap();
    assert_eq!(*sorting, vec![Sorting::new("name", SortDirection::Desc)]);
}

#[test]
fn test_grouping_state_owns_two_fields() {
    let report_keys: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&report_keys);
    let plugin = GroupingState::new()
        .default_grouping(vec![Grouping::new("city")])
        .on_expanded_groups_change(move |groups| sink.lock().unwrap().extend(groups.iter().cloned()));

    let mut host = PluginHost::default();
    host.mount(&plugin).unwrap();
    let report = host
        .batch(|tx| {
            tx.dispatch(
                names::CHANGE_COLUMN_GROUPING,
                Value::new(GroupingChange::toggle("name")),
            )?;
            tx.dispatch(names::TOGGLE_GROUP_EXPANDED, Value::new("Paris".to_string()))
        })
        .unwrap();

    assert_eq!(report.len(), 2);
    let grouping = host.resolve_as::<Vec<Grouping>>(names::GROUPING).unwrap().unwrap();
    assert_eq!(*grouping, vec![Grouping::new("city"), Grouping::new("name")]);
    assert_eq!(*report_keys.lock().unwrap(), vec!["Paris".to_string()]);
}

// ============================================================================
// Local row pipeline
// ============================================================================

#[test]
fn test_local_filtering_passes_rows_through_without_filters() {
    let grid = GridCore::new(sample_rows(), vec![]);
    let mut host = PluginHost::default();
    host.mount(&grid).unwrap();
    host.mount(&FilteringState::new()).unwrap();
    host.mount(&LocalFiltering).unwrap();

    let rows = host.require(names::ROWS).unwrap();
    assert!(rows.ptr_eq(&Value::from_arc(grid.rows().clone())));
}

#[test]
fn test_local_filtering_narrows_rows() {
    let mut host = PluginHost::default();
    host.mount(&GridCore::new(sample_rows(), vec![])).unwrap();
    host.mount(&FilteringState::new()).unwrap();
    host.mount(&LocalFiltering).unwrap();

    host.dispatch(
        names::SET_COLUMN_FILTER,
        Value::new(ColumnFilterChange::set("city", "PAR")),
    )
    .unwrap();

    assert_eq!(row_ids(&mut host), vec![1, 3, 5]);
}

#[test]
fn test_local_paging_wraps_filtered_rows() {
    let mut host = PluginHost::default();
    host.mount(&GridCore::new(sample_rows(), vec![])).unwrap();
    host.mount(&FilteringState::new().default_filters(vec![Filter::new("city", "par")]))
        .unwrap();
    host.mount(&PagingState::new().default_page_size(2)).unwrap();
    host.mount(&LocalFiltering).unwrap();
    host.mount(&LocalPaging).unwrap();

    assert_eq!(row_ids(&mut host), vec![1, 3]);

    host.dispatch(names::SET_CURRENT_PAGE, Value::new(1usize)).unwrap();
    assert_eq!(row_ids(&mut host), vec![5]);

    host.dispatch(names::SET_PAGE_SIZE, Value::new(0usize)).unwrap();
    assert_eq!(row_ids(&mut host), vec![1, 3, 5]);
}

#[test]
fn test_removing_local_paging_restores_filtered_rows() {
    let mut host = PluginHost::default();
    host.mount(&GridCore::new(sample_rows(), vec![])).unwrap();
    host.mount(&FilteringState::new().default_filters(vec![Filter::new("city", "par")]))
        .unwrap();
    host.mount(&PagingState::new().default_page_size(1)).unwrap();
    host.mount(&LocalFiltering).unwrap();
    let paging = host.mount(&LocalPaging).unwrap();

    assert_eq!(row_ids(&mut host), vec![1]);
    host.unmount(paging).unwrap();
    assert_eq!(row_ids(&mut host), vec![1, 3, 5]);
}

#[test]
fn test_paging_state_defaults() {
    let mut host = PluginHost::default();
    host.mount(&PagingState::new()).unwrap();

    assert_eq!(*host.resolve_as::<usize>(names::CURRENT_PAGE).unwrap().unwrap(), 0);
    assert_eq!(*host.resolve_as::<usize>(names::PAGE_SIZE).unwrap().unwrap(), 10);
}

#[test]
fn test_local_filtering_requires_filtering_state() {
    let mut host = PluginHost::default();
    host.mount(&GridCore::default()).unwrap();

    assert!(matches!(
        host.mount(&LocalFiltering),
        Err(EngineError::MissingPluginDependency { ref dependency, .. })
            if dependency == FilteringState::NAME
    ));
}

#[test]
fn test_local_filtering_without_base_rows() {
    let mut host = PluginHost::default();
    host.mount(&FilteringState::new().default_filters(vec![Filter::new("city", "par")]))
        .unwrap();
    host.mount(&LocalFiltering).unwrap();

    assert!(matches!(
        host.resolve(names::ROWS),
        Err(EngineError::UnresolvedCapability { .. })
    ));
}

// ============================================================================
// Registration catalog
// ============================================================================

#[test]
fn test_stock_plugins_are_registered() {
    let mut registered: Vec<&str> = registered_plugins().map(|r| r.name).collect();
    registered.sort_unstable();

    for expected in [
        GridCore::NAME,
        FilteringState::NAME,
        SelectionState::NAME,
        RowDetailState::NAME,
        PagingState::NAME,
        SortingState::NAME,
        GroupingState::NAME,
        LocalFiltering::NAME,
        LocalPaging::NAME,
    ] {
        assert!(registered.contains(&expected), "{} is not registered", expected);
    }
}

#[test]
fn test_mount_registered() {
    let mut host = PluginHost::default();
    host.mount_registered(GridCore::NAME).unwrap();
    host.mount_registered(FilteringState::NAME).unwrap();
    host.mount_registered(LocalFiltering::NAME).unwrap();

    assert!(row_ids(&mut host).is_empty());
    assert!(matches!(
        host.mount_registered("Nope"),
        Err(EngineError::UnknownPlugin(ref name)) if name == "Nope"
    ));
}
