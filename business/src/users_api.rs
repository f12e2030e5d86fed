//! User list API helper.
//!
//! Performs the network IO that feeds the user table. The controller in
//! [`crate::user_table`] never calls this; callers fetch, then hand the rows
//! to `TableState` derivations.

use log::info;
use serde::Deserialize;

use crate::http::{HttpClient, HttpError, HttpResult};
use crate::user_table::UserRow;

/// Default target of the user list, relative to the gateway base URL.
pub const USERS_TARGET: &str = "/users";

/// Accepts both a bare array and the `{ "users": [...] }` wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListUsersResponse {
    Bare(Vec<UserRow>),
    Wrapped { users: Vec<UserRow> },
}

/// GET `target` and decode the user rows.
pub async fn list_users(client: &HttpClient, target: &str) -> HttpResult<Vec<UserRow>> {
    let response = client.send(client.get(target)).await?;

    let users = match response.json().map_err(HttpError::Decode)? {
        ListUsersResponse::Bare(users) | ListUsersResponse::Wrapped { users } => users,
    };
    info!("fetched {} users from {target}", users.len());

    Ok(users)
}
