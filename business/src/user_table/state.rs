//! Sort, filter, pagination and selection state for a row table.
//!
//! The state never owns rows. Every derivation takes the current dataset as an
//! argument and is recomputed from scratch, so the result depends only on the
//! rows passed in and the fields below.

use std::cmp::Ordering;
use std::collections::HashSet;

use ustr::Ustr;

use super::row::Row;
use super::view::{SelectAllState, TableView};

/// Sort key used when the screen opens.
pub const DEFAULT_SORT_KEY: &str = "name";

/// Rows per page used when the screen opens.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Page sizes offered by the pagination control. Not enforced.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison result.
    pub fn orient(self, ascending: Ordering) -> Ordering {
        match self {
            Self::Ascending => ascending,
            Self::Descending => ascending.reverse(),
        }
    }
}

/// A single transition of [`TableState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    Sort(Ustr),
    Filter(String),
    Page(usize),
    PageSize(usize),
    SelectAll(Vec<Ustr>),
    SelectNone,
    ToggleSelect(Ustr),
}

/// Table controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    sort_direction: SortDirection,
    sort_key: Ustr,
    filter_text: String,
    page: usize,
    page_size: usize,
    /// Selected ids in selection order, no duplicates.
    selected: Vec<Ustr>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            sort_direction: SortDirection::Ascending,
            sort_key: Ustr::from(DEFAULT_SORT_KEY),
            filter_text: String::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            selected: Vec::new(),
        }
    }
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Equivalent to calling the matching setter.
    pub fn apply(&mut self, action: TableAction) {
        match action {
            TableAction::Sort(key) => self.set_sort(key),
            TableAction::Filter(text) => self.set_filter_text(text),
            TableAction::Page(page) => self.set_page(page),
            TableAction::PageSize(size) => self.set_page_size(size),
            TableAction::SelectAll(ids) => self.select_all(ids),
            TableAction::SelectNone => self.select_none(),
            TableAction::ToggleSelect(id) => self.toggle_select(id),
        }
    }

    /// Consuming form of [`Self::apply`].
    #[must_use]
    pub fn reduce(mut self, action: TableAction) -> Self {
        self.apply(action);
        self
    }

    // =====================
    // Transitions
    // =====================

    /// Clicking the current sort column flips the direction; any other column
    /// becomes the sort key, ascending.
    pub fn set_sort(&mut self, key: impl Into<Ustr>) {
        let key = key.into();
        if key == self.sort_key {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Replace the filter text verbatim. The page is left alone.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    /// Callers pass an already validated page; out of range pages show no rows.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 0;
    }

    /// Replace the selection with `ids`, keeping the first occurrence of duplicates.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = Ustr>) {
        let mut seen = HashSet::new();
        self.selected = ids.into_iter().filter(|id| seen.insert(*id)).collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Header checkbox: checked selects every row of the unfiltered dataset.
    pub fn toggle_select_all<R: Row>(&mut self, checked: bool, rows: &[R]) {
        if checked {
            self.select_all(rows.iter().map(Row::id));
        } else {
            self.select_none();
        }
    }

    /// Deselect `id` if selected, otherwise append it.
    ///
    /// Removal keeps the remaining ids in their original relative order.
    pub fn toggle_select(&mut self, id: Ustr) {
        match self.selected.iter().position(|s| *s == id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(id),
        }
    }

    /// Drop selected ids that are no longer present in `rows`.
    ///
    /// Call after replacing the dataset so the selection stays a subset of it.
    pub fn prune_selection<R: Row>(&mut self, rows: &[R]) {
        let present: HashSet<Ustr> = rows.iter().map(Row::id).collect();
        self.selected.retain(|id| present.contains(id));
    }

    // =====================
    // Getters
    // =====================

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn sort_key(&self) -> Ustr {
        self.sort_key
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selected(&self) -> &[Ustr] {
        &self.selected
    }

    pub fn num_selected(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: Ustr) -> bool {
        self.selected.contains(&id)
    }

    // =====================
    // Derivations
    // =====================

    /// Rows whose name contains the filter text (case-insensitive), sorted.
    ///
    /// The sort is stable: rows comparing equal keep their input order in
    /// both directions.
    pub fn filtered_rows<'a, R: Row>(&self, rows: &'a [R]) -> Vec<&'a R> {
        let mut matched: Vec<&R> = rows.iter().filter(|r| self.matches(*r)).collect();
        let key = self.sort_key.as_str();
        matched.sort_by(|a, b| self.sort_direction.orient(a.field(key).cmp(&b.field(key))));
        matched
    }

    /// The current page of [`Self::filtered_rows`].
    pub fn visible_rows<'a, R: Row>(&self, rows: &'a [R]) -> Vec<&'a R> {
        self.filtered_rows(rows)
            .into_iter()
            .skip(self.page_start())
            .take(self.page_size)
            .collect()
    }

    /// Whether the filter leaves nothing to show, before pagination.
    pub fn is_empty<R: Row>(&self, rows: &[R]) -> bool {
        !rows.iter().any(|r| self.matches(r))
    }

    /// Blank rows needed to keep a partially filled page at full height.
    /// Always zero on the first page.
    pub fn padding_rows<R: Row>(&self, rows: &[R]) -> usize {
        self.padding_for(rows.iter().filter(|r| self.matches(*r)).count())
    }

    /// Number of pages of the filtered dataset, at least one.
    pub fn page_count<R: Row>(&self, rows: &[R]) -> usize {
        self.page_count_for(rows.iter().filter(|r| self.matches(*r)).count())
    }

    /// Header checkbox state. Selected ids missing from `rows` are not counted.
    pub fn select_all_state<R: Row>(&self, rows: &[R]) -> SelectAllState {
        SelectAllState::from_counts(self.selected_in(rows), rows.len())
    }

    /// Everything a renderer needs, derived in one pass.
    pub fn view<'a, R: Row>(&self, rows: &'a [R]) -> TableView<'a, R> {
        let filtered = self.filtered_rows(rows);
        let filtered_count = filtered.len();
        let start = self.page_start();
        let visible = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        TableView {
            rows: visible,
            start,
            filtered_count,
            total_count: rows.len(),
            is_empty: filtered_count == 0,
            padding_rows: self.padding_for(filtered_count),
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count_for(filtered_count),
            sort_key: self.sort_key,
            sort_direction: self.sort_direction,
            num_selected: self.selected_in(rows),
            select_all: self.select_all_state(rows),
        }
    }

    fn matches<R: Row>(&self, row: &R) -> bool {
        row.name()
            .to_lowercase()
            .contains(&self.filter_text.to_lowercase())
    }

    fn selected_in<R: Row>(&self, rows: &[R]) -> usize {
        let present: HashSet<Ustr> = rows.iter().map(Row::id).collect();
        self.selected.iter().filter(|id| present.contains(*id)).count()
    }

    fn page_start(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    fn padding_for(&self, filtered_count: usize) -> usize {
        if self.page == 0 {
            return 0;
        }
        self.page
            .saturating_add(1)
            .saturating_mul(self.page_size)
            .saturating_sub(filtered_count)
    }

    fn page_count_for(&self, filtered_count: usize) -> usize {
        if self.page_size == 0 {
            return 1;
        }
        filtered_count.div_ceil(self.page_size).max(1)
    }
}
