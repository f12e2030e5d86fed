//! `kong-admin users`: the user list screen, rendered to the terminal.

use anyhow::Result;
use clap::Args;
use kong_admin_business::user_table::{ROWS_PER_PAGE_OPTIONS, USER_COLUMNS, user_column};
use kong_admin_business::users_api::{self, USERS_TARGET};
use kong_admin_business::{
    HttpClient, HttpError, SelectAllState, SortDirection, TableAction, TableState, TableView,
    UserRow,
};
use tabled::builder::Builder;
use tabled::settings::Style;
use thiserror::Error;
use tracing::{instrument, warn};
use ustr::Ustr;

use crate::output::Output;

#[derive(Debug, Clone, Args)]
pub struct UsersArgs {
    /// Path of the user list, relative to the gateway base URL
    #[arg(long, default_value = USERS_TARGET)]
    pub target: String,

    /// Click a column header; repeat a key to flip its direction
    #[arg(long = "sort", value_name = "KEY")]
    pub sort: Vec<String>,

    /// Only show users whose name contains this text (case-insensitive)
    #[arg(long, short = 'q', default_value = "")]
    pub filter: String,

    /// Rows per page (5, 10 or 25)
    #[arg(long, default_value_t = 5, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Zero-based page to show
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Toggle selection of a user id; may be repeated
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Select every user before applying --select toggles
    #[arg(long)]
    pub select_all: bool,
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_owned()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}

impl UsersArgs {
    /// Replay the flags as the interactions a user would perform on the screen.
    /// `page` is clamped to the last page.
    pub fn table_state(&self, rows: &[UserRow]) -> TableState {
        let mut state = TableState::new();

        for key in &self.sort {
            if user_column(key).is_none() {
                warn!(key = %key, "unknown sort key, rows keep their fetched order");
            }
            state.apply(TableAction::Sort(Ustr::from(key.as_str())));
        }
        state.apply(TableAction::Filter(self.filter.clone()));
        state.apply(TableAction::PageSize(self.page_size));

        let last_page = state.page_count(rows) - 1;
        if self.page > last_page {
            warn!(requested = self.page, last_page, "page out of range, showing last page");
        }
        state.apply(TableAction::Page(self.page.min(last_page)));

        if self.select_all {
            state.toggle_select_all(true, rows);
        }
        for id in &self.select {
            state.apply(TableAction::ToggleSelect(Ustr::from(id.as_str())));
        }
        state.prune_selection(rows);

        state
    }
}

/// A failure already shown to the user; `main` only sets the exit status.
#[derive(Debug, Error)]
#[error("failed to fetch users")]
pub struct ReportedError;

#[instrument(skip_all, name = "users", fields(target = %args.target))]
pub async fn run_users(client: &HttpClient, args: &UsersArgs) -> Result<()> {
    let out = Output::new();

    if !ROWS_PER_PAGE_OPTIONS.contains(&args.page_size) {
        out.warning(format!(
            "page size {} is not one of {ROWS_PER_PAGE_OPTIONS:?}",
            args.page_size
        ));
    }

    let rows = match users_api::list_users(client, &args.target).await {
        Ok(rows) => rows,
        Err(err) => {
            let (headline, detail) = describe_http_error(&err);
            out.failure(headline, detail.as_deref());
            return Err(ReportedError.into());
        }
    };

    let state = args.table_state(&rows);
    let view = state.view(&rows);

    out.title("User");
    if view.is_empty {
        if state.filter_text().is_empty() {
            out.note("No users.");
        } else {
            out.body(not_found_message(state.filter_text()));
        }
    } else {
        out.body(render_table(&view, &state));
    }
    out.note(footer(&view));

    Ok(())
}

/// Envelope message as the headline, the real cause as the detail.
fn describe_http_error(err: &HttpError) -> (String, Option<String>) {
    match err.envelope() {
        Some(envelope) => (
            envelope.message.clone(),
            Some(format!(
                "{} {}: {}",
                envelope.config.method, envelope.url, envelope.cause
            )),
        ),
        None => (err.to_string(), None),
    }
}

fn not_found_message(filter: &str) -> String {
    format!("No results found for \"{filter}\". Try checking for typos or using complete words.")
}

fn header_label(label: &str, column_id: &str, view: &TableView<'_, UserRow>) -> String {
    if view.sort_key.as_str() != column_id {
        return label.to_owned();
    }
    match view.sort_direction {
        SortDirection::Ascending => format!("{label} ▲"),
        SortDirection::Descending => format!("{label} ▼"),
    }
}

fn cell(row: &UserRow, column_id: &str) -> String {
    match column_id {
        "name" => row.name.clone(),
        "company" => row.company.clone(),
        "role" => row.role.clone(),
        "isVerified" => row.verified_label().to_owned(),
        "status" => row.status_label(),
        _ => String::new(),
    }
}

/// Render the visible page, padded with blank rows to a full page height.
fn render_table(view: &TableView<'_, UserRow>, state: &TableState) -> String {
    let mut builder = Builder::default();

    let mut header = vec![match view.select_all {
        SelectAllState::All => "[x]".to_owned(),
        SelectAllState::Indeterminate => "[-]".to_owned(),
        SelectAllState::None => "[ ]".to_owned(),
    }];
    header.extend(USER_COLUMNS.iter().map(|c| header_label(c.label, c.id, view)));
    builder.push_record(header);

    for row in &view.rows {
        let mut record = vec![checkbox(state.is_selected(row.id))];
        record.extend(USER_COLUMNS.iter().map(|c| cell(row, c.id)));
        builder.push_record(record);
    }
    for _ in 0..view.padding_rows {
        builder.push_record(vec![String::new(); USER_COLUMNS.len() + 1]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn checkbox(checked: bool) -> String {
    if checked { "[x]" } else { "[ ]" }.to_owned()
}

fn footer(view: &TableView<'_, UserRow>) -> String {
    let range = match view.display_range() {
        Some((first, last)) => format!("rows {first}–{last} of {}", view.filtered_count),
        None => format!("rows 0 of {}", view.filtered_count),
    };
    format!(
        "{range} · page {}/{} · {} selected",
        view.page + 1,
        view.page_count,
        view.num_selected
    )
}
