//! User table controller.
//!
//! Holds which rows of the user list are visible, in what order, and which
//! are selected:
//! - [`TableState`] owns sort, filter, pagination and selection, with one
//!   transition per user interaction (or [`TableAction`] via `apply`)
//! - derivations (`visible_rows`, `is_empty`, `padding_rows`, `view`) take the
//!   dataset as an argument and never cache it
//! - [`Row`] is the only thing the controller knows about a record

pub mod columns;
pub mod row;
pub mod state;
pub mod view;

pub use columns::{Column, USER_COLUMNS, user_column};
pub use row::{FieldValue, Row, UserRow};
pub use state::{
    DEFAULT_PAGE_SIZE, DEFAULT_SORT_KEY, ROWS_PER_PAGE_OPTIONS, SortDirection, TableAction,
    TableState,
};
pub use view::{SelectAllState, TableView};
