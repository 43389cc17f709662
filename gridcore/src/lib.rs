//! Pure data-grid transformations.
//!
//! Every function here takes the previous domain state plus a command payload
//! and returns the next state. None of them know about plugins, batching or
//! the host; `gridhost` invokes them through its actions and getters.

pub mod filtering;
pub mod grouping;
pub mod paging;
pub mod row;
pub mod row_detail;
pub mod selection;
pub mod sorting;

pub use filtering::{ColumnFilterChange, Filter, filtered_rows, set_column_filter};
pub use grouping::{GroupingChange, Grouping, change_column_grouping, toggle_expanded_group};
pub use paging::{page_count, paginated_rows, set_current_page, set_page_size};
pub use row::{Column, Row, RowId};
pub use row_detail::{DetailRowChange, is_detail_row_expanded, set_detail_row_expanded};
pub use selection::{SelectionChange, set_rows_selection};
pub use sorting::{KeepOther, SortDirection, Sorting, SortingChange, change_column_sorting};
