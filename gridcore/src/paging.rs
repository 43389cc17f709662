//! Paging.

use crate::row::Row;

pub fn set_current_page(_current_page: usize, page: usize) -> usize {
    page
}

pub fn set_page_size(_page_size: usize, page_size: usize) -> usize {
    page_size
}

/// Number of pages needed for `total` rows. A page size of 0 means a single
/// page holding every row.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Rows of one page. The page index is clamped to the last page.
pub fn paginated_rows(rows: &[Row], page_size: usize, current_page: usize) -> Vec<Row> {
    if page_size == 0 {
        return rows.to_vec();
    }

    let page = current_page.min(page_count(rows.len(), page_size) - 1);
    rows.iter()
        .skip(page * page_size)
        .take(page_size)
        .cloned()
        .collect()
}
