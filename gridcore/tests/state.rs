use gridcore::{
    DetailRowChange, Grouping, GroupingChange, KeepOther, Row, SelectionChange, SortDirection,
    Sorting, SortingChange, change_column_grouping, change_column_sorting, is_detail_row_expanded,
    page_count, paginated_rows, set_detail_row_expanded, set_rows_selection,
    toggle_expanded_group,
};

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_toggle_selection_selects_when_any_unselected() {
    let next = set_rows_selection(&[1], &SelectionChange::toggle(vec![1, 2]));
    assert_eq!(next, vec![1, 2]);
}

#[test]
fn test_toggle_selection_deselects_when_all_selected() {
    let next = set_rows_selection(&[3, 1, 2], &SelectionChange::toggle(vec![1, 2]));
    assert_eq!(next, vec![3]);
}

#[test]
fn test_explicit_selection() {
    let next = set_rows_selection(&[1], &SelectionChange::select(vec![1], true));
    assert_eq!(next, vec![1]);
    let next = set_rows_selection(&[1], &SelectionChange::select(vec![1], false));
    assert!(next.is_empty());
}

// ============================================================================
// Row detail
// ============================================================================

#[test]
fn test_detail_row_toggle() {
    let expanded = set_detail_row_expanded(&[], &DetailRowChange::toggle(5));
    assert_eq!(expanded, vec![5]);
    assert!(is_detail_row_expanded(&expanded, 5));

    let collapsed = set_detail_row_expanded(&expanded, &DetailRowChange::toggle(5));
    assert!(collapsed.is_empty());
}

#[test]
fn test_detail_row_explicit_is_idempotent() {
    let expanded = set_detail_row_expanded(&[5], &DetailRowChange::expand(5, true));
    assert_eq!(expanded, vec![5]);
}

// ============================================================================
// Paging
// ============================================================================

#[test]
fn test_page_count() {
    assert_eq!(page_count(0, 5), 1);
    assert_eq!(page_count(10, 5), 2);
    assert_eq!(page_count(11, 5), 3);
    assert_eq!(page_count(11, 0), 1);
}

#[test]
fn test_paginated_rows_clamps_page() {
    let rows: Vec<Row> = (0..7).map(Row::new).collect();
    let page: Vec<u64> = paginated_rows(&rows, 3, 1).iter().map(|r| r.id).collect();
    assert_eq!(page, vec![3, 4, 5]);

    let last: Vec<u64> = paginated_rows(&rows, 3, 99).iter().map(|r| r.id).collect();
    assert_eq!(last, vec![6]);

    assert_eq!(paginated_rows(&rows, 0, 4).len(), 7);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_sorting_cycles_direction() {
    let first = change_column_sorting(&[], &SortingChange::toggle("a"));
    assert_eq!(first, vec![Sorting::new("a", SortDirection::Asc)]);

    let second = change_column_sorting(&first, &SortingChange::toggle("a"));
    assert_eq!(second, vec![Sorting::new("a", SortDirection::Desc)]);
}

#[test]
fn test_sorting_replaces_other_columns_by_default() {
    let sorting = vec![Sorting::new("a", SortDirection::Asc)];
    let next = change_column_sorting(&sorting, &SortingChange::toggle("b"));
    assert_eq!(next, vec![Sorting::new("b", SortDirection::Asc)]);
}

#[test]
fn test_sorting_keep_other_preserves_position() {
    let sorting = vec![
        Sorting::new("a", SortDirection::Asc),
        Sorting::new("b", SortDirection::Asc),
    ];
    let next = change_column_sorting(
        &sorting,
        &SortingChange::toggle("a").keep_other(KeepOther::All),
    );
    assert_eq!(
        next,
        vec![
            Sorting::new("a", SortDirection::Desc),
            Sorting::new("b", SortDirection::Asc),
        ]
    );
}

#[test]
fn test_sorting_keep_listed_columns_and_cancel() {
    let sorting = vec![
        Sorting::new("a", SortDirection::Asc),
        Sorting::new("b", SortDirection::Desc),
        Sorting::new("c", SortDirection::Asc),
    ];
    let next = change_column_sorting(
        &sorting,
        &SortingChange::toggle("c")
            .keep_other(KeepOther::Columns(vec!["b".into(), "c".into()]))
            .cancel(),
    );
    assert_eq!(next, vec![Sorting::new("b", SortDirection::Desc)]);
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_grouping_add_move_remove() {
    let grouping = change_column_grouping(&[], &GroupingChange::toggle("a"));
    let grouping = change_column_grouping(&grouping, &GroupingChange::at("b", 0));
    assert_eq!(grouping, vec![Grouping::new("b"), Grouping::new("a")]);

    let moved = change_column_grouping(&grouping, &GroupingChange::at("b", 1));
    assert_eq!(moved, vec![Grouping::new("a"), Grouping::new("b")]);

    let removed = change_column_grouping(&moved, &GroupingChange::at("b", 1));
    assert_eq!(removed, vec![Grouping::new("a")]);
}

#[test]
fn test_toggle_expanded_group() {
    let expanded = toggle_expanded_group(&[], "Paris");
    assert_eq!(expanded, vec!["Paris".to_string()]);
    assert!(toggle_expanded_group(&expanded, "Paris").is_empty());
}
