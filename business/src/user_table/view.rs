use ustr::Ustr;

use super::state::SortDirection;

/// Header checkbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    None,
    Indeterminate,
    All,
}

impl SelectAllState {
    pub fn from_counts(num_selected: usize, row_count: usize) -> Self {
        if row_count > 0 && num_selected == row_count {
            Self::All
        } else if num_selected > 0 && num_selected < row_count {
            Self::Indeterminate
        } else {
            Self::None
        }
    }
}

/// Snapshot of a table derived from [`super::TableState::view`].
///
/// Borrowed from the dataset it was derived from; re-derive after any change.
#[derive(Debug)]
pub struct TableView<'a, R> {
    /// Rows of the current page, in display order.
    pub rows: Vec<&'a R>,
    /// Index of `rows[0]` within the filtered rows.
    pub start: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    /// Nothing matched the filter.
    pub is_empty: bool,
    pub padding_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub sort_key: Ustr,
    pub sort_direction: SortDirection,
    pub num_selected: usize,
    pub select_all: SelectAllState,
}

impl<R> TableView<'_, R> {
    /// One-based, inclusive range of the displayed rows, e.g. `(6, 10)`.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            None
        } else {
            Some((self.start + 1, self.start + self.rows.len()))
        }
    }
}
