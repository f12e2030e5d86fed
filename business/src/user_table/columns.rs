//! Column definitions for the user table.
//!
//! Only renderers read these; the controller sorts by whatever key it is given.

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field key passed to [`super::TableState::set_sort`].
    pub id: &'static str,
    pub label: &'static str,
    pub align_right: bool,
    pub sortable: bool,
}

impl Column {
    const fn sortable(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            align_right: false,
            sortable: true,
        }
    }
}

/// Columns of the user list, in display order.
pub const USER_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("company", "Company"),
    Column::sortable("role", "Role"),
    Column::sortable("isVerified", "Verified"),
    Column::sortable("status", "Status"),
];

/// Look up a column by its id.
pub fn user_column(id: &str) -> Option<&'static Column> {
    USER_COLUMNS.iter().find(|c| c.id == id)
}
